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

impl Compiler {
    /// A closure bound by `let` is built directly in its temp rather than in the
    /// scratch local, which keeps the scratch free for nested records.
    pub(super) fn compile_let(&mut self, temp: u32, value: &Ir, body: &Ir) {
        match value {
            Ir::MakeClosure { fun, captures } => {
                let record = self.ctx.temp(temp);
                self.emit_closure_record(*fun, captures, record);
            }
            _ => {
                self.compile_ir(value);
                self.emit_set_temp(temp);
            }
        }
        self.compile_ir(body);
    }

    pub(super) fn compile_if(&mut self, cond: &Ir, then_branch: &Ir, else_branch: &Ir) {
        self.compile_ir(cond);
        self.emit(Instr::If);
        self.compile_ir(then_branch);
        self.emit(Instr::Else);
        self.compile_ir(else_branch);
        self.emit(Instr::End);
    }

    /// `(arg, env)` where the environment is the closure record itself, then an
    /// indirect call through the table slot stored in the record.
    pub(super) fn compile_call(&mut self, closure: u32, arg: u32) {
        self.emit_get_temp(arg);
        self.emit_get_temp(closure);
        self.emit_get_temp(closure);
        self.emit(Instr::I32Load {
            offset: crate::layout::CLOSURE_FN_OFFSET,
        });
        self.emit(Instr::CallIndirect { type_index: TYPE_FN });
    }
}
