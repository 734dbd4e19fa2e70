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

use super::*;
use crate::layout::{PAGE_SHIFT, SIZE_OFFSET, TAG_OFFSET, WORD};

impl Compiler {
    pub(super) fn emit(&mut self, instr: Instr) {
        self.ctx.emit(instr);
    }

    pub(super) fn emit_get_temp(&mut self, temp: u32) {
        let idx = self.ctx.temp(temp);
        self.emit(Instr::LocalGet(idx));
    }

    pub(super) fn emit_set_temp(&mut self, temp: u32) {
        let idx = self.ctx.temp(temp);
        self.emit(Instr::LocalSet(idx));
    }

    /// `alloc(words, tag)`, leaving the record address on the stack.
    pub(super) fn emit_alloc(&mut self, words: u32, tag: i32) {
        self.emit(Instr::I32Const(words as i32));
        self.emit(Instr::I32Const(tag));
        self.emit(Instr::Call(ALLOC_FUNC));
    }

    /// `*(local + offset) = value`, for a record held in `local`.
    pub(super) fn emit_store_field(&mut self, local: u32, offset: u32, value: Instr) {
        self.emit(Instr::LocalGet(local));
        self.emit(value);
        self.emit(Instr::I32Store { offset });
    }

    /// `$alloc (param $n) (param $tag) (result i32)`
    ///
    /// Advances the bump pointer by `n` words, growing memory first when the new
    /// end lies past the last page, then writes the word count and tag as the
    /// first two words of the record and returns it.
    pub(super) fn compile_alloc(&mut self) {
        let mut ctx = FunctionContext::new(&["n", "tag"]);
        let p = ctx.declare_local("p");
        let last_page = ctx.declare_local("last_page");
        self.begin_function(ctx);

        // p = hp; hp += n * 4
        self.emit(Instr::GlobalGet(HEAP_POINTER_GLOBAL));
        self.emit(Instr::LocalTee(p));
        self.emit(Instr::LocalGet(0));
        self.emit(Instr::I32Const(WORD as i32));
        self.emit(Instr::I32Mul);
        self.emit(Instr::I32Add);
        self.emit(Instr::GlobalSet(HEAP_POINTER_GLOBAL));

        // Page holding the record's last byte.
        self.emit(Instr::GlobalGet(HEAP_POINTER_GLOBAL));
        self.emit(Instr::I32Const(1));
        self.emit(Instr::I32Sub);
        self.emit(Instr::I32Const(PAGE_SHIFT as i32));
        self.emit(Instr::I32ShrU);
        self.emit(Instr::LocalSet(last_page));

        // memory.grow(last_page + 1 - memory.size) when memory.size <= last_page.
        // A failed grow leaves the stores below to trap.
        self.emit(Instr::MemorySize);
        self.emit(Instr::LocalGet(last_page));
        self.emit(Instr::I32LeS);
        self.emit(Instr::If);
        self.emit(Instr::LocalGet(last_page));
        self.emit(Instr::I32Const(1));
        self.emit(Instr::I32Add);
        self.emit(Instr::MemorySize);
        self.emit(Instr::I32Sub);
        self.emit(Instr::MemoryGrow);
        self.emit(Instr::Else);
        self.emit(Instr::I32Const(0));
        self.emit(Instr::End);
        self.emit(Instr::Drop);

        self.emit_store_field(p, SIZE_OFFSET, Instr::LocalGet(0));
        self.emit_store_field(p, TAG_OFFSET, Instr::LocalGet(1));

        self.emit(Instr::LocalGet(p));
        self.finish_function("alloc", TYPE_FN, None);
    }

    /// One `(arg, env) -> result` wrapper per host import. Printing builtins
    /// return unit, encoded as 0; `now_ms` ignores its unit argument.
    pub(super) fn compile_wrappers(&mut self) {
        for (import, name) in BUILTINS.iter().enumerate() {
            let import = import as u32;
            self.begin_function(FunctionContext::new(&["arg", "env"]));
            let signature = SIGNATURES[BUILTIN_TYPES[import as usize] as usize];
            if signature.params == 1 {
                self.emit(Instr::LocalGet(0));
            }
            self.emit(Instr::Call(import));
            if !signature.result {
                self.emit(Instr::I32Const(0));
            }
            self.finish_function(format!("wrap_{name}"), TYPE_FN, None);
        }
    }
}
