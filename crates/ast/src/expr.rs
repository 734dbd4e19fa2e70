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

use std::fmt;

use crate::op::BinOp;
use crate::Ident;

/// Every construct takes a single argument; `let f a b = ...` and `f x y` are
/// desugared by the parser into nested lambdas and applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal: `42`
    Int(i32),

    /// `true` / `false`
    Bool(bool),

    /// `()`
    Unit,

    /// Variable reference: `x`
    Var(Ident),

    /// `let name = value in body`
    Let {
        name: Ident,
        value: Box<Expr>,
        body: Box<Expr>,
    },

    /// `let rec name param = body in rest`
    LetRec {
        name: Ident,
        param: Ident,
        body: Box<Expr>,
        rest: Box<Expr>,
    },

    /// `fun param -> body`
    Fun { param: Ident, body: Box<Expr> },

    /// Juxtaposition: `callee arg`
    App { callee: Box<Expr>, arg: Box<Expr> },

    /// `if cond then then_branch else else_branch`
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Binary primitive: `x + y`, `x <= y`, ...
    Prim {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `(e1, e2, ...)` with at least two elements
    Tuple(Vec<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<Ident>) -> Self {
        Expr::Var(name.into())
    }

    pub fn let_(name: impl Into<Ident>, value: Expr, body: Expr) -> Self {
        Expr::Let {
            name: name.into(),
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    pub fn let_rec(name: impl Into<Ident>, param: impl Into<Ident>, body: Expr, rest: Expr) -> Self {
        Expr::LetRec {
            name: name.into(),
            param: param.into(),
            body: Box::new(body),
            rest: Box::new(rest),
        }
    }

    pub fn fun(param: impl Into<Ident>, body: Expr) -> Self {
        Expr::Fun {
            param: param.into(),
            body: Box::new(body),
        }
    }

    pub fn app(callee: Expr, arg: Expr) -> Self {
        Expr::App {
            callee: Box::new(callee),
            arg: Box::new(arg),
        }
    }

    pub fn if_(cond: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn prim(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Prim {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Binding strength used when printing; higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Let { .. } | Expr::LetRec { .. } | Expr::Fun { .. } | Expr::If { .. } => 0,
            Expr::Prim { op, .. } => match op {
                BinOp::Eq | BinOp::Lt | BinOp::Le => 1,
                BinOp::Add | BinOp::Sub => 2,
                BinOp::Mul => 3,
            },
            Expr::App { .. } => 4,
            Expr::Int(n) if *n < 0 => 2,
            Expr::Int(_) | Expr::Bool(_) | Expr::Unit | Expr::Var(_) | Expr::Tuple(_) => 5,
        }
    }

    fn fmt_at(&self, min: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            self.fmt_at(0, f)?;
            return write!(f, ")");
        }
        match self {
            // No negative literals in the surface syntax.
            Expr::Int(n) if *n < 0 => write!(f, "0 - {}", n.unsigned_abs()),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Unit => write!(f, "()"),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Let { name, value, body } => {
                write!(f, "let {} = ", name)?;
                value.fmt_at(0, f)?;
                write!(f, " in ")?;
                body.fmt_at(0, f)
            }
            Expr::LetRec {
                name,
                param,
                body,
                rest,
            } => {
                write!(f, "let rec {} {} = ", name, param)?;
                body.fmt_at(0, f)?;
                write!(f, " in ")?;
                rest.fmt_at(0, f)
            }
            Expr::Fun { param, body } => {
                write!(f, "fun {} -> ", param)?;
                body.fmt_at(0, f)
            }
            Expr::App { callee, arg } => {
                callee.fmt_at(4, f)?;
                write!(f, " ")?;
                arg.fmt_at(5, f)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ")?;
                cond.fmt_at(0, f)?;
                write!(f, " then ")?;
                then_branch.fmt_at(0, f)?;
                write!(f, " else ")?;
                else_branch.fmt_at(0, f)
            }
            Expr::Prim { op, left, right } => {
                let level = self.precedence();
                left.fmt_at(level, f)?;
                write!(f, " {} ", op)?;
                right.fmt_at(level + 1, f)
            }
            Expr::Tuple(elts) => {
                write!(f, "(")?;
                for (i, elt) in elts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    elt.fmt_at(0, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Prints a surface form that parses back to the same tree. Negative literals,
/// which only arise from hand-built trees, print as a subtraction from zero.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(0, f)
    }
}
