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

//! Static compilation pipeline: type inference, closure conversion and code
//! generation to WebAssembly.

pub mod closure;
pub mod compiler;
pub mod encode;
pub mod functions;
pub mod instruction;
pub mod ir;
pub mod layout;
pub mod text;
pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;

use ast::Expr;
use thiserror::Error;
use tracing::{debug, instrument};

pub use closure::{to_ir, LowerError};
pub use compiler::CompiledModule;
pub use ir::{Ir, IrFun, IrModule};
pub use type_checker::{type_of, TypeError};
pub use types::Ty;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("type error: {0}")]
    Type(#[from] TypeError),
    #[error("internal error: {0}")]
    Lower(#[from] LowerError),
}

/// Lower a closure-converted module to per-function instruction streams.
pub fn lower(module: &IrModule) -> CompiledModule {
    compiler::Compiler::new().compile_module(module)
}

/// WebAssembly text for `module`. Total: every module `to_ir` produces is emittable,
/// and the output is a pure function of the input.
#[instrument(skip_all)]
pub fn emit(module: &IrModule) -> String {
    let wat = text::render(&lower(module));
    debug!(bytes = wat.len(), "rendered module text");
    wat
}

/// The same module as [`emit`], encoded as a binary.
#[instrument(skip_all)]
pub fn assemble(module: &IrModule) -> Vec<u8> {
    let bytes = encode::encode(&lower(module));
    debug!(bytes = bytes.len(), "assembled module binary");
    bytes
}

/// Compile a parsed program to WebAssembly text.
///
/// This is the main entry point for the static compilation pipeline:
/// 1. Runs inference and rejects ill-typed programs
/// 2. Closure-converts the checked tree
/// 3. Emits the converted module as text
pub fn compile(expr: &Expr) -> Result<String, CompileError> {
    type_of(expr)?;
    let module = to_ir(expr)?;
    Ok(emit(&module))
}
