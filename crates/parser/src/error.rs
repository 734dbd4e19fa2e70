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

use thiserror::Error;

/// A lex or parse failure. Every variant carries the 1-based line and column
/// of the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{line}:{col}: unexpected character '{ch}'")]
    UnexpectedChar { line: usize, col: usize, ch: char },

    #[error("{line}:{col}: integer literal {literal} does not fit in 32 bits")]
    IntegerOutOfRange {
        line: usize,
        col: usize,
        literal: String,
    },

    #[error("{line}:{col}: {token} unexpected after {context}")]
    UnexpectedToken {
        line: usize,
        col: usize,
        token: String,
        context: &'static str,
    },

    /// A required keyword or symbol (`in`, `then`, `else`, `->`, `=`, `)`) is missing.
    #[error("{line}:{col}: expected '{expected}' in {context}, found {found}")]
    Expected {
        line: usize,
        col: usize,
        expected: &'static str,
        found: String,
        context: &'static str,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedChar { line, .. }
            | ParseError::IntegerOutOfRange { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::Expected { line, .. } => *line,
        }
    }

    pub fn col(&self) -> usize {
        match self {
            ParseError::UnexpectedChar { col, .. }
            | ParseError::IntegerOutOfRange { col, .. }
            | ParseError::UnexpectedToken { col, .. }
            | ParseError::Expected { col, .. } => *col,
        }
    }

    /// Rendering of the offending input: the literal value, the identifier,
    /// keyword or symbol text, or `<eof>`.
    pub fn token(&self) -> String {
        match self {
            ParseError::UnexpectedChar { ch, .. } => ch.to_string(),
            ParseError::IntegerOutOfRange { literal, .. } => literal.clone(),
            ParseError::UnexpectedToken { token, .. } => token.clone(),
            ParseError::Expected { found, .. } => found.clone(),
        }
    }
}
