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

mod binop;
mod expr;

use logos::Span;
use std::iter::Peekable;

use ast::Expr;

use crate::error::ParseError;
use crate::lexer::{LineIndex, SpannedToken, Token};

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a pre-lexed token stream.
///
/// Precedence, lowest to highest: `let`/`if`/`fun`, comparison, additive,
/// multiplicative, application, atoms.
pub struct Parser<'src, I: Iterator<Item = SpannedToken>> {
    tokens: Peekable<I>,
    current_span: Span,
    /// Source text for slicing identifiers and literals
    source: &'src str,
    lines: LineIndex<'src>,
}

impl<'src, I: Iterator<Item = SpannedToken>> Parser<'src, I> {
    pub fn new(source: &'src str, iterator: I) -> Self {
        Self {
            tokens: iterator.peekable(),
            current_span: 0..0,
            source,
            lines: LineIndex::new(source),
        }
    }

    /// Peek at the next token. An exhausted stream reads as `Eof`.
    fn peek_token(&mut self) -> Token {
        self.tokens
            .peek()
            .map(|(t, _)| *t)
            .unwrap_or(Token::Eof)
    }

    fn peek_span(&mut self) -> Span {
        let end = self.source.len();
        self.tokens
            .peek()
            .map(|(_, s)| s.clone())
            .unwrap_or(end..end)
    }

    /// Advances to the next token and returns it, updating the current span.
    fn advance(&mut self) -> Option<Token> {
        let (token, span) = self.tokens.next()?;
        self.current_span = span;
        Some(token)
    }

    fn text(&self, span: &Span) -> &'src str {
        &self.source[span.start..span.end]
    }

    /// Source text of the last consumed token.
    fn last_text(&self) -> &'src str {
        self.text(&self.current_span)
    }

    /// Human-readable rendering of a token for diagnostics.
    fn describe(&self, token: Token, span: &Span) -> String {
        match token {
            Token::Eof => "<eof>".to_string(),
            Token::Int => {
                let text = self.text(span);
                text.parse::<i64>()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|_| text.to_string())
            }
            _ => self.text(span).to_string(),
        }
    }

    /// Checks if the next token matches, consuming it if so.
    fn eat(&mut self, expected: Token) -> bool {
        if self.peek_token() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error pointing at the next (unconsumed) token.
    fn unexpected(&mut self, context: &'static str) -> ParseError {
        let token = self.peek_token();
        let span = self.peek_span();
        let (line, col) = self.lines.position(span.start);
        ParseError::UnexpectedToken {
            line,
            col,
            token: self.describe(token, &span),
            context,
        }
    }

    /// Consumes `expected` or reports what was found in its place.
    fn expect(
        &mut self,
        expected: Token,
        spelling: &'static str,
        context: &'static str,
    ) -> ParseResult<()> {
        let token = self.peek_token();
        if token == expected {
            self.advance();
            return Ok(());
        }
        let span = self.peek_span();
        let (line, col) = self.lines.position(span.start);
        Err(ParseError::Expected {
            line,
            col,
            expected: spelling,
            found: self.describe(token, &span),
            context,
        })
    }

    /// Consume an identifier and return its text.
    fn expect_ident(&mut self, context: &'static str) -> ParseResult<String> {
        if self.peek_token() == Token::Ident {
            self.advance();
            Ok(self.last_text().to_string())
        } else {
            Err(self.unexpected(context))
        }
    }

    /// Parse one complete expression followed by end of input.
    pub fn parse_program(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        if self.peek_token() != Token::Eof {
            return Err(self.unexpected("expression"));
        }
        Ok(expr)
    }
}
