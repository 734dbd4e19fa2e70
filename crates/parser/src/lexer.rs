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

use logos::{Logos, Span};

use crate::error::ParseError;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")] // newlines only matter for error positions, see `LineIndex`
pub enum Token {
    // Keywords
    #[token("let")] Let,
    #[token("rec")] Rec,
    #[token("in")] In,
    #[token("fun")] Fun,
    #[token("if")] If,
    #[token("then")] Then,
    #[token("else")] Else,
    #[token("true")] True,
    #[token("false")] False,

    // Multi-char symbols
    #[token("<=")] Le,
    #[token("->")] Arrow,

    // Single-char symbols
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("=")] Eq,
    #[token("<")] Lt,
    #[token(",")] Comma,

    // Literals and identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    // End of input, appended by `tokenize`
    Eof,
}

impl Token {
    /// Tokens that can begin an atom, and therefore an application argument.
    pub fn starts_atom(self) -> bool {
        matches!(
            self,
            Token::Int | Token::True | Token::False | Token::Ident | Token::LParen
        )
    }
}

pub type SpannedToken = (Token, Span);

/// Lex the whole input up front. The first character that no token matches is
/// reported before any parsing happens. The returned stream always ends in `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let (line, col) = LineIndex::new(source).position(span.start);
                let ch = source[span.start..].chars().next().unwrap_or('\0');
                return Err(ParseError::UnexpectedChar { line, col, ch });
            }
        }
    }
    tokens.push((Token::Eof, source.len()..source.len()));
    Ok(tokens)
}

/// Maps byte offsets to 1-based line/column pairs. Columns count characters.
pub struct LineIndex<'src> {
    source: &'src str,
    /// Byte offset at which each line starts
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let col = self.source[line_start..offset].chars().count() + 1;
        (line, col)
    }
}
