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
use thiserror::Error;

/// Failures of the reference interpreter. A program that type checks never
/// raises one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    #[error("if condition is not a boolean: {0}")]
    NonBooleanCondition(String),

    #[error("attempt to call non-function {0}")]
    NotAFunction(String),

    #[error("{builtin} expects {expected}, got {found}")]
    BuiltinArgument {
        builtin: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("invalid operands for {0}")]
    InvalidOperands(BinOp),

    #[error("tuple arity mismatch in equality: {left} and {right} elements")]
    TupleArity { left: usize, right: usize },

    #[error("evaluation exceeded {0} pending continuations")]
    StackExhausted(usize),
}

/// Traps raised while executing a compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("function {0} does not exist")]
    UnknownFunction(u32),

    #[error("import `{0}` is not provided by the host")]
    UnknownImport(String),

    #[error("local {0} is out of range")]
    UnknownLocal(u32),

    #[error("global {0} is out of range")]
    UnknownGlobal(u32),

    #[error("out of bounds memory access at {address}")]
    OutOfBounds { address: u64 },

    #[error("table index {0} is out of bounds")]
    TableOutOfBounds(i32),

    #[error("indirect call type mismatch: expected type {expected}, found type {found}")]
    SignatureMismatch { expected: u32, found: u32 },

    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("function {0} returned with an unbalanced operand stack")]
    UnbalancedStack(u32),

    #[error("unmatched structured control instruction in function {0}")]
    MalformedControl(u32),

    #[error("call stack exhausted")]
    CallStackExhausted,

    #[error("no active call frame")]
    NoFrame,
}
