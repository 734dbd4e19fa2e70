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

//! Lexer and recursive-descent parser for the surface language.

pub mod error;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

use ast::Expr;
use tracing::debug;

pub use error::ParseError;
pub use parser::Parser;

/// Parse source text into a single expression that spans the whole input.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "lexed source");
    let mut parser = Parser::new(source, tokens.into_iter());
    parser.parse_program()
}
