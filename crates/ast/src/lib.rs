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

//! Surface syntax shared by every stage of the pipeline.
//!
//! The parser produces an [`Expr`]; the type checker, the closure converter and the
//! reference interpreter all consume it without rewriting it.

pub mod expr;
pub mod op;
pub mod scope;

#[cfg(test)]
mod tests;

pub use expr::Expr;
pub use op::BinOp;
pub use scope::Scope;

/// Identifiers are plain strings; no renaming happens on the surface tree.
pub type Ident = String;

/// Names of the host builtins, in function-table order.
///
/// The type checker seeds its environment with these, the closure converter binds
/// them to the first temps of the entry point, and the code generator wires the
/// first table slots to wrappers around the matching host imports.
pub const BUILTINS: [&str; 4] = ["print_int", "print_bool", "print_unit", "now_ms"];
