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

use ast::BinOp;

use super::*;

impl Compiler {
    /// Both operands, then the native instruction. Comparisons are signed.
    pub(super) fn compile_prim(&mut self, op: BinOp, left: &Ir, right: &Ir) {
        self.compile_ir(left);
        self.compile_ir(right);
        self.emit(Instr::from_op(op));
    }
}
