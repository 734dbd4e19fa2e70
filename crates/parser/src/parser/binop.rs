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

use super::*;

impl<'src, I: Iterator<Item = SpannedToken>> Parser<'src, I> {
    // = < <=
    // A single left-folding level: `a < b < c` is `(a < b) < c`.
    pub(super) fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_token() {
                Token::Eq => BinOp::Eq,
                Token::Lt => BinOp::Lt,
                Token::Le => BinOp::Le,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::prim(op, left, right);
        }
        Ok(left)
    }

    // + -
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_token() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::prim(op, left, right);
        }
        Ok(left)
    }

    // *
    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_application()?;
        while self.eat(Token::Star) {
            let right = self.parse_application()?;
            left = Expr::prim(BinOp::Mul, left, right);
        }
        Ok(left)
    }

    // Juxtaposition, left-associative: `f x y` is `(f x) y`.
    fn parse_application(&mut self) -> ParseResult<Expr> {
        let mut callee = self.parse_atom()?;
        while self.peek_token().starts_atom() {
            let arg = self.parse_atom()?;
            callee = Expr::app(callee, arg);
        }
        Ok(callee)
    }
}
