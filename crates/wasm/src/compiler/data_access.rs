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
use crate::layout::{
    capture_offset, element_offset, CLOSURE_COUNT_OFFSET, CLOSURE_FN_OFFSET,
    CLOSURE_HEADER_WORDS, TAG_CLOSURE, TAG_OFFSET, TAG_TUPLE, TUPLE_HEADER_WORDS,
};

impl Compiler {
    /// Allocate and fill a closure record, leaving its address in local `record`.
    pub(super) fn emit_closure_record(&mut self, fun: u32, captures: &[u32], record: u32) {
        self.emit_alloc(CLOSURE_HEADER_WORDS + captures.len() as u32, TAG_CLOSURE);
        self.emit(Instr::LocalSet(record));
        self.emit_store_field(record, CLOSURE_FN_OFFSET, Instr::I32Const(fun as i32));
        self.emit_store_field(
            record,
            CLOSURE_COUNT_OFFSET,
            Instr::I32Const(captures.len() as i32),
        );
        for (i, temp) in captures.iter().enumerate() {
            let value = Instr::LocalGet(self.ctx.temp(*temp));
            self.emit_store_field(record, capture_offset(i as u32), value);
        }
    }

    pub(super) fn compile_make_closure(&mut self, fun: u32, captures: &[u32]) {
        let record = self.ctx.scratch();
        self.emit_closure_record(fun, captures, record);
        self.emit(Instr::LocalGet(record));
    }

    pub(super) fn compile_tuple(&mut self, elts: &[u32]) {
        let record = self.ctx.scratch();
        self.emit_alloc(TUPLE_HEADER_WORDS + elts.len() as u32, TAG_TUPLE);
        self.emit(Instr::LocalSet(record));
        for (i, temp) in elts.iter().enumerate() {
            let value = Instr::LocalGet(self.ctx.temp(*temp));
            self.emit_store_field(record, element_offset(i as u32), value);
        }
        self.emit(Instr::LocalGet(record));
    }

    /// Slot `index` of a tuple or closure record. The header length is derived from
    /// the record's tag (`tag * 8` extra bytes for a closure), so the same code
    /// reads tuple elements and the captures of an environment.
    pub(super) fn compile_proj(&mut self, tuple: u32, index: u32) {
        self.emit_get_temp(tuple);
        self.emit_get_temp(tuple);
        self.emit(Instr::I32Load { offset: TAG_OFFSET });
        self.emit(Instr::I32Const(
            ((CLOSURE_HEADER_WORDS - TUPLE_HEADER_WORDS) * crate::layout::WORD) as i32,
        ));
        self.emit(Instr::I32Mul);
        self.emit(Instr::I32Add);
        self.emit(Instr::I32Load {
            offset: element_offset(index),
        });
    }
}
