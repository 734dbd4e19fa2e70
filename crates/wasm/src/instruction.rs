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

//! The instruction subset the code generator emits.
//!
//! Every value is an `i32`. The same buffered stream is rendered as text, encoded as
//! a binary module, and executed by the `vm` crate's machine.

use ast::BinOp;
use wasm_encoder::{BlockType, Instruction, MemArg, ValType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// Push an immediate
    I32Const(i32),
    LocalGet(u32),
    LocalSet(u32),
    /// Set a local and keep the value on the stack
    LocalTee(u32),
    GlobalGet(u32),
    GlobalSet(u32),
    I32Add,
    I32Sub,
    I32Mul,
    I32Eq,
    I32LtS,
    I32LeS,
    I32ShrU,
    /// Pop an address, push the word at `address + offset`
    I32Load { offset: u32 },
    /// Pop a value and an address, store the value at `address + offset`
    I32Store { offset: u32 },
    /// Direct call by function index
    Call(u32),
    /// Pop a table slot and call through it, checking the signature against `type_index`
    CallIndirect { type_index: u32 },
    /// Push the memory size in pages
    MemorySize,
    /// Pop a page count, grow memory by it and push the old size (or -1)
    MemoryGrow,
    Drop,
    /// Pop a condition; both arms leave one `i32`
    If,
    Else,
    End,
}

impl Instr {
    pub fn from_op(op: BinOp) -> Self {
        match op {
            BinOp::Add => Instr::I32Add,
            BinOp::Sub => Instr::I32Sub,
            BinOp::Mul => Instr::I32Mul,
            BinOp::Eq => Instr::I32Eq,
            BinOp::Lt => Instr::I32LtS,
            BinOp::Le => Instr::I32LeS,
        }
    }

    /// Word-aligned access to memory 0.
    fn mem_arg(offset: u32) -> MemArg {
        MemArg {
            offset: u64::from(offset),
            align: 2,
            memory_index: 0,
        }
    }

    pub fn to_encoder(self) -> Instruction<'static> {
        match self {
            Instr::I32Const(n) => Instruction::I32Const(n),
            Instr::LocalGet(i) => Instruction::LocalGet(i),
            Instr::LocalSet(i) => Instruction::LocalSet(i),
            Instr::LocalTee(i) => Instruction::LocalTee(i),
            Instr::GlobalGet(i) => Instruction::GlobalGet(i),
            Instr::GlobalSet(i) => Instruction::GlobalSet(i),
            Instr::I32Add => Instruction::I32Add,
            Instr::I32Sub => Instruction::I32Sub,
            Instr::I32Mul => Instruction::I32Mul,
            Instr::I32Eq => Instruction::I32Eq,
            Instr::I32LtS => Instruction::I32LtS,
            Instr::I32LeS => Instruction::I32LeS,
            Instr::I32ShrU => Instruction::I32ShrU,
            Instr::I32Load { offset } => Instruction::I32Load(Self::mem_arg(offset)),
            Instr::I32Store { offset } => Instruction::I32Store(Self::mem_arg(offset)),
            Instr::Call(f) => Instruction::Call(f),
            Instr::CallIndirect { type_index } => Instruction::CallIndirect {
                type_index,
                table_index: 0,
            },
            Instr::MemorySize => Instruction::MemorySize(0),
            Instr::MemoryGrow => Instruction::MemoryGrow(0),
            Instr::Drop => Instruction::Drop,
            Instr::If => Instruction::If(BlockType::Result(ValType::I32)),
            Instr::Else => Instruction::Else,
            Instr::End => Instruction::End,
        }
    }
}
