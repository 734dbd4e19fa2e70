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

//! First-order intermediate representation produced by closure conversion.
//!
//! Every intermediate value lives in a numbered temp. Temps are dense per frame:
//! the entry point and each lifted function number theirs from 0.

use std::fmt;

use ast::{BinOp, Ident};

pub type Temp = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ir {
    Int(i32),
    Bool(bool),
    Unit,
    Var(Temp),
    Let {
        temp: Temp,
        value: Box<Ir>,
        body: Box<Ir>,
    },
    If {
        cond: Box<Ir>,
        then_branch: Box<Ir>,
        else_branch: Box<Ir>,
    },
    Prim {
        op: BinOp,
        left: Box<Ir>,
        right: Box<Ir>,
    },
    /// Closure record for lifted function `fun`, capturing `captures` in order.
    MakeClosure { fun: u32, captures: Vec<Temp> },
    /// Apply the closure held in `closure` to the value held in `arg`.
    Call { closure: Temp, arg: Temp },
    Tuple(Vec<Temp>),
    /// Slot `index` of the record held in `tuple`.
    Proj { tuple: Temp, index: u32 },
}

impl Ir {
    pub fn let_(temp: Temp, value: Ir, body: Ir) -> Self {
        Ir::Let {
            temp,
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    /// Number of nodes, for logging.
    pub fn size(&self) -> usize {
        match self {
            Ir::Int(_)
            | Ir::Bool(_)
            | Ir::Unit
            | Ir::Var(_)
            | Ir::MakeClosure { .. }
            | Ir::Call { .. }
            | Ir::Tuple(_)
            | Ir::Proj { .. } => 1,
            Ir::Let { value, body, .. } => 1 + value.size() + body.size(),
            Ir::If {
                cond,
                then_branch,
                else_branch,
            } => 1 + cond.size() + then_branch.size() + else_branch.size(),
            Ir::Prim { left, right, .. } => 1 + left.size() + right.size(),
        }
    }
}

/// A lifted function. It receives its argument and its own closure record, the
/// latter serving as the environment its captures are projected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrFun {
    /// Function-table index; builtins take the first slots.
    pub index: u32,
    pub param: Temp,
    pub env: Temp,
    pub body: Ir,
    /// Captured names in capture order (sorted by name).
    pub free: Vec<Ident>,
    /// Temps used by this function's frame.
    pub frame_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrModule {
    pub main: Ir,
    /// Lifted functions, innermost first (a function is recorded once its body is lowered).
    pub funs: Vec<IrFun>,
    /// Temps used by the entry point's frame.
    pub temp_count: u32,
}

impl IrModule {
    pub fn fun(&self, index: u32) -> Option<&IrFun> {
        self.funs.iter().find(|f| f.index == index)
    }

    /// Lifted functions ordered by table index.
    pub fn funs_by_index(&self) -> Vec<&IrFun> {
        let mut funs: Vec<&IrFun> = self.funs.iter().collect();
        funs.sort_by_key(|f| f.index);
        funs
    }
}

// Debug dump: one node per line, `tN` for temps.
impl fmt::Display for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn temps(ts: &[Temp]) -> String {
            ts.iter().map(|t| format!("t{t}")).collect::<Vec<_>>().join(", ")
        }
        match self {
            Ir::Int(n) => write!(f, "{n}"),
            Ir::Bool(b) => write!(f, "{b}"),
            Ir::Unit => write!(f, "()"),
            Ir::Var(t) => write!(f, "t{t}"),
            Ir::Let { temp, value, body } => write!(f, "let t{temp} = {value} in\n{body}"),
            Ir::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "if {cond} then ({then_branch}) else ({else_branch})"),
            Ir::Prim { op, left, right } => write!(f, "({left} {op} {right})"),
            Ir::MakeClosure { fun, captures } => write!(f, "closure f{fun} [{}]", temps(captures)),
            Ir::Call { closure, arg } => write!(f, "call t{closure} t{arg}"),
            Ir::Tuple(elts) => write!(f, "tuple [{}]", temps(elts)),
            Ir::Proj { tuple, index } => write!(f, "t{tuple}.{index}"),
        }
    }
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fun in self.funs_by_index() {
            writeln!(
                f,
                "fun f{} (param t{}, env t{}) frame {} captures [{}]",
                fun.index,
                fun.param,
                fun.env,
                fun.frame_size,
                fun.free.join(", ")
            )?;
            writeln!(f, "{}\n", fun.body)?;
        }
        writeln!(f, "main frame {}", self.temp_count)?;
        writeln!(f, "{}", self.main)
    }
}
