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

//! Execution engines: the reference interpreter over source trees, and a
//! stack machine that runs compiled modules against the same [`Host`].

pub mod builtin;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod machine;

#[cfg(test)]
mod tests;

use wasm::IrModule;

pub use error::{MachineError, RuntimeError};
pub use host::{Host, HostEvent, RecordingHost, StdoutHost};
pub use interpreter::{eval_expr, Value};
pub use machine::Machine;

/// Lowers `module` and runs it on the machine, returning `main`'s result.
pub fn run_module(module: &IrModule, host: &mut dyn Host) -> Result<i32, MachineError> {
    let compiled = wasm::lower(module);
    Machine::new(&compiled)?.run(host)
}
