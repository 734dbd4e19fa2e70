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

use wasm::compiler::{CompiledFunction, CompiledModule, TYPE_FN, TYPE_RESULT};
use wasm::functions::FunctionContext;
use wasm::instruction::Instr;
use wasm::layout::{HEAP_BASE, MEMORY_PAGES, PAGE_SIZE, TAG_TUPLE};
use wasm::{lower, to_ir};

use crate::error::MachineError;
use crate::host::{HostEvent, RecordingHost};
use crate::machine::{Machine, MAX_CALL_DEPTH, MAX_MEMORY_PAGES};
use crate::run_module;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn run(source: &str) -> (i32, Vec<HostEvent>) {
    let expr = parser::parse(source).expect("parse failed");
    wasm::type_of(&expr).expect("type check should succeed");
    let module = to_ir(&expr).expect("closure conversion should succeed");
    let mut host = RecordingHost::new();
    let result = run_module(&module, &mut host).expect("machine should not trap");
    (result, host.into_events())
}

/// A module whose only function is `main`, with the given body.
fn module_with_main(instrs: &[Instr]) -> CompiledModule {
    let mut body = FunctionContext::new(&[]);
    for instr in instrs {
        body.emit(*instr);
    }
    CompiledModule {
        imports: Vec::new(),
        functions: vec![CompiledFunction {
            name: "main".to_string(),
            type_index: TYPE_RESULT,
            export: Some("main"),
            body,
        }],
        table: Vec::new(),
        main: 0,
    }
}

fn trap(module: &CompiledModule) -> MachineError {
    let mut host = RecordingHost::new();
    Machine::new(module)
        .and_then(|mut machine| machine.run(&mut host))
        .expect_err("machine should trap")
}

// ─── Compiled programs ────────────────────────────────────────────────────────

#[test]
fn test_recursive_sum() {
    let (result, _) = run("let rec sum n = if n<=0 then 0 else n + (sum (n-1)) in sum 5");
    assert_eq!(result, 15);
}

#[test]
fn test_fibonacci() {
    let (result, _) = run("let rec fib n = if n <= 1 then n else fib (n - 1) + fib (n - 2) in fib 10");
    assert_eq!(result, 55);
}

#[test]
fn test_closures_and_captures() {
    let (result, _) = run("let compose f g = fun x -> f (g x) in compose (fun a -> a + 1) (fun b -> b * 2) 5");
    assert_eq!(result, 11);
    let (result, _) = run("let x = 1 in let f = fun y -> x + y in let x = 10 in f 5");
    assert_eq!(result, 6);
}

#[test]
fn test_booleans_and_unit_are_words() {
    assert_eq!(run("1 < 2").0, 1);
    assert_eq!(run("2 <= 1").0, 0);
    assert_eq!(run("()").0, 0);
}

#[test]
fn test_builtin_calls_reach_the_host() {
    let (result, events) = run("let u = print_int 41 in let v = print_bool false in print_unit ()");
    assert_eq!(result, 0);
    assert_eq!(
        events,
        vec![
            HostEvent::PrintInt(41),
            HostEvent::PrintBool(false),
            HostEvent::PrintUnit,
        ]
    );
}

#[test]
fn test_tuple_record_layout() {
    let expr = parser::parse("(7, true)").unwrap();
    let compiled = lower(&to_ir(&expr).unwrap());
    let mut machine = Machine::new(&compiled).unwrap();
    let mut host = RecordingHost::new();
    let address = machine.run(&mut host).unwrap();

    assert!(address >= HEAP_BASE);
    let address = address as u32;
    assert_eq!(machine.word(address), Some(4));
    assert_eq!(machine.word(address + 4), Some(TAG_TUPLE));
    assert_eq!(machine.word(address + 8), Some(7));
    assert_eq!(machine.word(address + 12), Some(1));
    // The record is the last allocation.
    assert_eq!(machine.heap_pointer(), address as i32 + 16);
    assert!(machine.steps() > 0);
}

#[test]
fn test_non_tail_recursion_uses_frames() {
    let (result, _) = run("let rec sum n = if n = 0 then 0 else n + sum (n - 1) in sum 1000");
    assert_eq!(result, 500500);
}

#[test]
fn test_deep_non_tail_recursion() {
    let (result, _) = run("let rec sum n = if n<=0 then 0 else n + (sum (n-1)) in sum 10000");
    assert_eq!(result, 50005000);
}

#[test]
fn test_allocation_grows_memory() {
    let expr = parser::parse(
        "let rec loop n = if n <= 0 then 0 else let t = (n, n) in loop (n - 1) in loop 100000",
    )
    .unwrap();
    let compiled = lower(&to_ir(&expr).unwrap());
    let mut machine = Machine::new(&compiled).unwrap();
    let mut host = RecordingHost::new();
    assert_eq!(machine.run(&mut host), Ok(0));

    // 100000 tuples of 16 bytes do not fit in the initial pages.
    assert!(machine.memory_pages() > MEMORY_PAGES as usize);
    let top = machine.heap_pointer() as usize;
    assert!(top <= machine.memory_pages() * PAGE_SIZE);
}

// ─── Linear memory ────────────────────────────────────────────────────────────

#[test]
fn test_memory_grow_reports_the_previous_size() {
    let initial = MEMORY_PAGES as i32;
    let grow = |delta| {
        let module = module_with_main(&[Instr::I32Const(delta), Instr::MemoryGrow]);
        let mut machine = Machine::new(&module).unwrap();
        let mut host = RecordingHost::new();
        let old = machine.run(&mut host).unwrap();
        (old, machine.memory_pages())
    };
    assert_eq!(grow(3), (initial, MEMORY_PAGES as usize + 3));
    assert_eq!(grow(0), (initial, MEMORY_PAGES as usize));
    assert_eq!(grow(-1), (-1, MEMORY_PAGES as usize));
    assert_eq!(grow(MAX_MEMORY_PAGES as i32), (-1, MEMORY_PAGES as usize));

    let module = module_with_main(&[
        Instr::I32Const(1),
        Instr::MemoryGrow,
        Instr::Drop,
        Instr::MemorySize,
    ]);
    let mut host = RecordingHost::new();
    let size = Machine::new(&module).and_then(|mut machine| machine.run(&mut host));
    assert_eq!(size, Ok(initial + 1));
}

// ─── Structured control ───────────────────────────────────────────────────────

#[test]
fn test_if_else_selects_an_arm() {
    let arms = |cond| {
        module_with_main(&[
            Instr::I32Const(cond),
            Instr::If,
            Instr::I32Const(10),
            Instr::Else,
            Instr::I32Const(20),
            Instr::End,
        ])
    };
    let mut host = RecordingHost::new();
    assert_eq!(Machine::new(&arms(1)).unwrap().run(&mut host), Ok(10));
    assert_eq!(Machine::new(&arms(0)).unwrap().run(&mut host), Ok(20));
}

#[test]
fn test_unmatched_control_is_rejected_up_front() {
    let module = module_with_main(&[Instr::I32Const(1), Instr::If, Instr::I32Const(2)]);
    assert_eq!(trap(&module), MachineError::MalformedControl(0));
    let module = module_with_main(&[Instr::I32Const(1), Instr::End]);
    assert_eq!(trap(&module), MachineError::MalformedControl(0));
}

// ─── Traps ────────────────────────────────────────────────────────────────────

#[test]
fn test_bad_table_index() {
    let module = module_with_main(&[Instr::I32Const(0), Instr::CallIndirect { type_index: TYPE_FN }]);
    assert_eq!(trap(&module), MachineError::TableOutOfBounds(0));
}

#[test]
fn test_indirect_call_signature_mismatch() {
    let mut module = module_with_main(&[Instr::I32Const(0), Instr::CallIndirect { type_index: TYPE_FN }]);
    module.table = vec![0];
    assert_eq!(
        trap(&module),
        MachineError::SignatureMismatch {
            expected: TYPE_FN,
            found: TYPE_RESULT,
        }
    );
}

#[test]
fn test_out_of_bounds_load() {
    let module = module_with_main(&[Instr::I32Const(-4), Instr::I32Load { offset: 0 }]);
    assert_eq!(
        trap(&module),
        MachineError::OutOfBounds {
            address: u64::from(u32::MAX - 3),
        }
    );
}

#[test]
fn test_stack_underflow() {
    let module = module_with_main(&[Instr::I32Const(1), Instr::I32Add]);
    assert_eq!(trap(&module), MachineError::StackUnderflow);
}

#[test]
fn test_unbalanced_return() {
    let module = module_with_main(&[Instr::I32Const(1), Instr::I32Const(2)]);
    assert_eq!(trap(&module), MachineError::UnbalancedStack(0));
}

#[test]
fn test_runaway_recursion_exhausts_the_call_stack() {
    let module = module_with_main(&[Instr::Call(0)]);
    assert_eq!(trap(&module), MachineError::CallStackExhausted);
    assert!(MAX_CALL_DEPTH > 1000);
}
