/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! A stack machine for the instruction subset the code generator emits, so
//! compiled programs can run without an external WebAssembly engine.
//!
//! Calls never recurse on the native stack: each call pushes a [`CallFrame`]
//! and the dispatch loop always executes the innermost one.

mod instruction_handlers;

use tracing::{debug, instrument};
use wasm::compiler::{CompiledModule, SIGNATURES};
use wasm::instruction::Instr;
use wasm::layout::{HEAP_BASE, MEMORY_PAGES, PAGE_SIZE};

use crate::error::MachineError;
use crate::host::Host;

/// Deepest call nesting before the machine traps.
pub const MAX_CALL_DEPTH: usize = 250_000;

/// Upper bound on linear memory: the whole 32-bit address space.
pub const MAX_MEMORY_PAGES: usize = 1 << 16;

struct CallFrame {
    /// Function index in the module's index space
    func: u32,
    /// Position of the function among the module's defined functions
    defined: usize,
    /// Index of the next instruction to execute
    pc: usize,
    locals: Vec<i32>,
    /// Operand stack height when the frame was entered
    stack_base: usize,
    returns: bool,
}

pub struct Machine<'m> {
    module: &'m CompiledModule,
    /// Linear memory, little-endian
    memory: Vec<u8>,
    globals: Vec<i32>,
    stack: Vec<i32>,
    call_stack: Vec<CallFrame>,
    /// Per defined function: for each `if`, the pc just past its `else` (or
    /// `end`); for each `else`, the pc just past its `end`.
    jumps: Vec<Vec<Option<usize>>>,
    steps: u64,
}

impl<'m> Machine<'m> {
    pub fn new(module: &'m CompiledModule) -> Result<Self, MachineError> {
        let jumps = module
            .functions
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let func = (module.imports.len() + i) as u32;
                Self::jump_table(func, f.body.instructions())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            module,
            memory: vec![0; MEMORY_PAGES as usize * PAGE_SIZE],
            globals: vec![HEAP_BASE],
            stack: Vec::new(),
            call_stack: Vec::new(),
            jumps,
            steps: 0,
        })
    }

    fn jump_table(func: u32, body: &[Instr]) -> Result<Vec<Option<usize>>, MachineError> {
        let mut table = vec![None; body.len()];
        // (pc of `if`, pc of its `else` if seen)
        let mut open: Vec<(usize, Option<usize>)> = Vec::new();
        for (pc, instr) in body.iter().enumerate() {
            match instr {
                Instr::If => open.push((pc, None)),
                Instr::Else => {
                    let block = open.last_mut().ok_or(MachineError::MalformedControl(func))?;
                    if block.1.is_some() {
                        return Err(MachineError::MalformedControl(func));
                    }
                    block.1 = Some(pc);
                }
                Instr::End => {
                    let (if_pc, else_pc) = open.pop().ok_or(MachineError::MalformedControl(func))?;
                    match else_pc {
                        Some(else_pc) => {
                            table[if_pc] = Some(else_pc + 1);
                            table[else_pc] = Some(pc + 1);
                        }
                        None => table[if_pc] = Some(pc + 1),
                    }
                }
                _ => {}
            }
        }
        if open.is_empty() {
            Ok(table)
        } else {
            Err(MachineError::MalformedControl(func))
        }
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current size of linear memory in pages.
    pub fn memory_pages(&self) -> usize {
        self.memory.len() / PAGE_SIZE
    }

    /// Current value of the heap pointer.
    pub fn heap_pointer(&self) -> i32 {
        self.globals.first().copied().unwrap_or(HEAP_BASE)
    }

    /// The word at byte `address` of linear memory.
    pub fn word(&self, address: u32) -> Option<i32> {
        let start = address as usize;
        let bytes = self.memory.get(start..start.checked_add(4)?)?;
        Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Runs the module's entry point to completion and returns its result.
    #[instrument(skip_all)]
    pub fn run(&mut self, host: &mut dyn Host) -> Result<i32, MachineError> {
        self.call(self.module.main, host)?;

        loop {
            let module = self.module;
            let Some(frame) = self.call_stack.last_mut() else {
                break;
            };
            let body = module.functions[frame.defined].body.instructions();
            let Some(&instr) = body.get(frame.pc) else {
                self.op_return()?;
                continue;
            };
            frame.pc += 1;
            self.steps += 1;
            self.match_instruction(instr, host)?;
        }

        let result = self.pop()?;
        debug!(result, steps = self.steps, heap = self.heap_pointer(), "machine halted");
        Ok(result)
    }

    fn match_instruction(&mut self, instr: Instr, host: &mut dyn Host) -> Result<(), MachineError> {
        match instr {
            Instr::I32Const(n) => self.push(n),
            Instr::LocalGet(idx) => self.op_local_get(idx),
            Instr::LocalSet(idx) => self.op_local_set(idx),
            Instr::LocalTee(idx) => self.op_local_tee(idx),
            Instr::GlobalGet(idx) => self.op_global_get(idx),
            Instr::GlobalSet(idx) => self.op_global_set(idx),
            Instr::I32Add => self.op_binary(i32::wrapping_add),
            Instr::I32Sub => self.op_binary(i32::wrapping_sub),
            Instr::I32Mul => self.op_binary(i32::wrapping_mul),
            Instr::I32Eq => self.op_binary(|a, b| i32::from(a == b)),
            Instr::I32LtS => self.op_binary(|a, b| i32::from(a < b)),
            Instr::I32LeS => self.op_binary(|a, b| i32::from(a <= b)),
            Instr::I32ShrU => self.op_binary(|a, b| ((a as u32) >> (b as u32 % 32)) as i32),
            Instr::I32Load { offset } => self.op_load(offset),
            Instr::I32Store { offset } => self.op_store(offset),
            Instr::Call(func) => self.call(func, host),
            Instr::CallIndirect { type_index } => self.op_call_indirect(type_index, host),
            Instr::MemorySize => self.op_memory_size(),
            Instr::MemoryGrow => self.op_memory_grow(),
            Instr::Drop => self.pop().map(drop),
            Instr::If => self.op_if(),
            Instr::Else => self.op_else(),
            Instr::End => Ok(()),
        }
    }

    /// Calls function `func`: imports run on the host immediately, defined
    /// functions get a new frame with their parameters popped off the stack.
    fn call(&mut self, func: u32, host: &mut dyn Host) -> Result<(), MachineError> {
        let module = self.module;
        if let Some(import) = module.import(func) {
            return self.call_host(import.name, host);
        }
        let defined = func as usize - module.imports.len();
        let f = module
            .functions
            .get(defined)
            .ok_or(MachineError::UnknownFunction(func))?;
        if self.call_stack.len() >= MAX_CALL_DEPTH {
            return Err(MachineError::CallStackExhausted);
        }

        let signature = SIGNATURES
            .get(f.type_index as usize)
            .copied()
            .ok_or(MachineError::UnknownFunction(func))?;
        let mut locals = vec![0; f.body.local_count() as usize];
        for slot in (0..signature.params as usize).rev() {
            locals[slot] = self.pop()?;
        }
        self.call_stack.push(CallFrame {
            func,
            defined,
            pc: 0,
            locals,
            stack_base: self.stack.len(),
            returns: signature.result,
        });
        Ok(())
    }

    fn call_host(&mut self, name: &str, host: &mut dyn Host) -> Result<(), MachineError> {
        match name {
            "print_int" => {
                let n = self.pop()?;
                host.print_int(n);
            }
            "print_bool" => {
                let b = self.pop()?;
                host.print_bool(b != 0);
            }
            "print_unit" => host.print_unit(),
            "now_ms" => {
                let now = host.now_ms();
                self.push(now)?;
            }
            other => return Err(MachineError::UnknownImport(other.to_string())),
        }
        Ok(())
    }

    fn frame(&mut self) -> Result<&mut CallFrame, MachineError> {
        self.call_stack.last_mut().ok_or(MachineError::NoFrame)
    }

    fn push(&mut self, value: i32) -> Result<(), MachineError> {
        self.stack.push(value);
        Ok(())
    }

    /// Pops an operand, never reaching below the current frame's base.
    fn pop(&mut self) -> Result<i32, MachineError> {
        let base = self.call_stack.last().map_or(0, |f| f.stack_base);
        if self.stack.len() <= base {
            return Err(MachineError::StackUnderflow);
        }
        self.stack.pop().ok_or(MachineError::StackUnderflow)
    }
}
