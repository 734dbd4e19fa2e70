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

//! WebAssembly text rendering of a compiled module.

use std::fmt::{self, Write};

use crate::compiler::{CompiledFunction, CompiledModule, HEAP_POINTER_GLOBAL, SIGNATURES, TYPE_FN};
use crate::functions::FunctionContext;
use crate::instruction::Instr;
use crate::layout::{HEAP_BASE, MEMORY_PAGES};

/// Renders a [`CompiledModule`] as a `(module ...)` s-expression.
pub struct WatPrinter<'m> {
    module: &'m CompiledModule,
}

impl<'m> WatPrinter<'m> {
    pub fn new(module: &'m CompiledModule) -> Self {
        Self { module }
    }

    fn write_imports(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.module.imports {
            let signature = SIGNATURES[import.type_index as usize];
            write!(f, "  (import \"{}\" \"{}\" (func ${}", import.module, import.name, import.name)?;
            if signature.params > 0 {
                write!(f, " (param{})", " i32".repeat(signature.params as usize))?;
            }
            if signature.result {
                write!(f, " (result i32)")?;
            }
            writeln!(f, "))")?;
        }
        Ok(())
    }

    fn write_function(&self, func: &CompiledFunction, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = &func.body;
        write!(f, "  (func ${}", func.name)?;
        if let Some(export) = func.export {
            write!(f, " (export \"{export}\")")?;
        }
        if func.type_index == TYPE_FN {
            write!(f, " (type $fn)")?;
        }
        for param in body.params() {
            write!(f, " (param ${param} i32)")?;
        }
        if SIGNATURES[func.type_index as usize].result {
            write!(f, " (result i32)")?;
        }
        writeln!(f)?;

        let locals = body.extra_locals();
        if !locals.is_empty() {
            let decls: Vec<String> = locals.iter().map(|name| format!("(local ${name} i32)")).collect();
            writeln!(f, "    {}", decls.join(" "))?;
        }

        let mut depth: usize = 2;
        for instr in body.instructions() {
            if matches!(instr, Instr::Else | Instr::End) {
                depth = depth.saturating_sub(1);
            }
            writeln!(f, "{:indent$}{}", "", self.instruction_text(body, *instr), indent = depth * 2)?;
            if matches!(instr, Instr::If | Instr::Else) {
                depth += 1;
            }
        }
        writeln!(f, "  )")
    }

    fn instruction_text(&self, body: &FunctionContext, instr: Instr) -> String {
        let local = |idx: u32| match body.local_name(idx) {
            Some(name) => format!("${name}"),
            None => idx.to_string(),
        };
        let memory = |op: &str, offset: u32| match offset {
            0 => op.to_string(),
            _ => format!("{op} offset={offset}"),
        };
        match instr {
            Instr::I32Const(n) => format!("i32.const {n}"),
            Instr::LocalGet(idx) => format!("local.get {}", local(idx)),
            Instr::LocalSet(idx) => format!("local.set {}", local(idx)),
            Instr::LocalTee(idx) => format!("local.tee {}", local(idx)),
            Instr::GlobalGet(idx) => format!("global.get {}", global_name(idx)),
            Instr::GlobalSet(idx) => format!("global.set {}", global_name(idx)),
            Instr::I32Add => "i32.add".to_string(),
            Instr::I32Sub => "i32.sub".to_string(),
            Instr::I32Mul => "i32.mul".to_string(),
            Instr::I32Eq => "i32.eq".to_string(),
            Instr::I32LtS => "i32.lt_s".to_string(),
            Instr::I32LeS => "i32.le_s".to_string(),
            Instr::I32ShrU => "i32.shr_u".to_string(),
            Instr::I32Load { offset } => memory("i32.load", offset),
            Instr::I32Store { offset } => memory("i32.store", offset),
            Instr::Call(func) => match self.module.function_name(func) {
                Some(name) => format!("call ${name}"),
                None => format!("call {func}"),
            },
            Instr::CallIndirect { type_index } if type_index == TYPE_FN => {
                "call_indirect (type $fn)".to_string()
            }
            Instr::CallIndirect { type_index } => format!("call_indirect (type {type_index})"),
            Instr::MemorySize => "memory.size".to_string(),
            Instr::MemoryGrow => "memory.grow".to_string(),
            Instr::Drop => "drop".to_string(),
            Instr::If => "if (result i32)".to_string(),
            Instr::Else => "else".to_string(),
            Instr::End => "end".to_string(),
        }
    }
}

fn global_name(idx: u32) -> String {
    if idx == HEAP_POINTER_GLOBAL {
        "$hp".to_string()
    } else {
        idx.to_string()
    }
}

impl fmt::Display for WatPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(module")?;
        self.write_imports(f)?;
        writeln!(f, "  (memory (export \"mem\") {MEMORY_PAGES})")?;
        writeln!(f, "  (global $hp (mut i32) (i32.const {HEAP_BASE}))")?;
        writeln!(f, "  (type $fn (func (param i32 i32) (result i32)))")?;

        let mut elems = String::new();
        for func in &self.module.table {
            if let Some(name) = self.module.function_name(*func) {
                write!(elems, " ${name}")?;
            }
        }
        writeln!(f, "  (table funcref (elem{elems}))")?;

        for func in &self.module.functions {
            self.write_function(func, f)?;
        }
        writeln!(f, ")")
    }
}

/// Render a compiled module as WebAssembly text.
pub fn render(module: &CompiledModule) -> String {
    WatPrinter::new(module).to_string()
}
