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

// Booleans are 0/1 and unit is 0, so every value fits one `i32`.
impl Compiler {
    pub(super) fn compile_int(&mut self, n: i32) {
        self.emit(Instr::I32Const(n));
    }

    pub(super) fn compile_bool(&mut self, b: bool) {
        self.emit(Instr::I32Const(i32::from(b)));
    }

    pub(super) fn compile_unit(&mut self) {
        self.emit(Instr::I32Const(0));
    }
}
