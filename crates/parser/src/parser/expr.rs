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

impl<'src, I: Iterator<Item = SpannedToken>> Parser<'src, I> {
    /// Entry point for expression parsing: the open-ended binders `let`, `if`
    /// and `fun`, falling through to the operator levels.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        match self.peek_token() {
            Token::Let => self.parse_let(),
            Token::If => self.parse_if(),
            Token::Fun => self.parse_fun(),
            _ => self.parse_comparison(),
        }
    }

    /// `let [rec] name param* = expr in expr`
    fn parse_let(&mut self) -> ParseResult<Expr> {
        self.advance(); // consume `let`
        let is_rec = self.eat(Token::Rec);
        let name = self.expect_ident(if is_rec { "let rec" } else { "let" })?;

        let mut params = Vec::new();
        while self.peek_token() == Token::Ident {
            params.push(self.expect_ident("let parameter")?);
        }

        if is_rec {
            self.parse_let_rec_tail(name, params)
        } else {
            self.expect(Token::Eq, "=", "let binding")?;
            let value = self.parse_expr()?;
            // `let f a b = e` binds `fun a -> fun b -> e`
            let value = params
                .into_iter()
                .rev()
                .fold(value, |body, param| Expr::fun(param, body));
            self.expect(Token::In, "in", "let binding")?;
            let body = self.parse_expr()?;
            Ok(Expr::let_(name, value, body))
        }
    }

    /// The recursive parameter is the first one; the rest curry into the body.
    fn parse_let_rec_tail(&mut self, name: String, params: Vec<String>) -> ParseResult<Expr> {
        let mut params = params.into_iter();
        let Some(param) = params.next() else {
            return Err(self.unexpected("let rec"));
        };
        let rest_params: Vec<String> = params.collect();

        self.expect(Token::Eq, "=", "let rec binding")?;
        let body = self.parse_expr()?;
        let body = rest_params
            .into_iter()
            .rev()
            .fold(body, |body, param| Expr::fun(param, body));
        self.expect(Token::In, "in", "let rec binding")?;
        let rest = self.parse_expr()?;
        Ok(Expr::let_rec(name, param, body, rest))
    }

    /// `if expr then expr else expr`
    fn parse_if(&mut self) -> ParseResult<Expr> {
        self.advance(); // consume `if`
        let cond = self.parse_expr()?;
        self.expect(Token::Then, "then", "if expression")?;
        let then_branch = self.parse_expr()?;
        self.expect(Token::Else, "else", "if expression")?;
        let else_branch = self.parse_expr()?;
        Ok(Expr::if_(cond, then_branch, else_branch))
    }

    /// `fun param -> expr`
    fn parse_fun(&mut self) -> ParseResult<Expr> {
        self.advance(); // consume `fun`
        let param = self.expect_ident("fun")?;
        self.expect(Token::Arrow, "->", "fun parameter")?;
        let body = self.parse_expr()?;
        Ok(Expr::fun(param, body))
    }

    /// Literals, identifiers, `()`, parenthesised expressions and tuples.
    pub(super) fn parse_atom(&mut self) -> ParseResult<Expr> {
        match self.peek_token() {
            Token::Int => {
                let span = self.peek_span();
                let literal = self.text(&span);
                let value = literal.parse::<i32>().map_err(|_| {
                    let (line, col) = self.lines.position(span.start);
                    ParseError::IntegerOutOfRange {
                        line,
                        col,
                        literal: literal.to_string(),
                    }
                })?;
                self.advance();
                Ok(Expr::Int(value))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::Ident => {
                self.advance();
                Ok(Expr::var(self.last_text()))
            }
            Token::LParen => {
                self.advance();
                self.parse_paren_tail()
            }
            _ => Err(self.unexpected("atom")),
        }
    }

    /// After `(`: unit, grouping, or a tuple of at least two elements.
    fn parse_paren_tail(&mut self) -> ParseResult<Expr> {
        if self.eat(Token::RParen) {
            return Ok(Expr::Unit);
        }

        let first = self.parse_expr()?;
        if !self.eat(Token::Comma) {
            self.expect(Token::RParen, ")", "grouping")?;
            return Ok(first);
        }

        let mut elts = vec![first];
        loop {
            elts.push(self.parse_expr()?);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen, ")", "tuple")?;
        Ok(Expr::Tuple(elts))
    }
}
