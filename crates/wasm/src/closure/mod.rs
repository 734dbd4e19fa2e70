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

//! Closure conversion.
//!
//! Every `fun` and every `let rec` binding becomes a lifted [`IrFun`]. A lifted
//! function reads its captures out of its own closure record, which the caller
//! passes as the environment, in sorted-name order. A `let rec` function also
//! rebuilds a closure for itself from those captures so the body can recurse.

mod free_vars;

pub use free_vars::free_vars;

use ast::{Expr, Ident, Scope, BUILTINS};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::ir::{Ir, IrFun, IrModule, Temp};

/// Reaching one of these means the tree was not checked before lowering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("unbound variable `{0}` during closure conversion")]
    UnboundVariable(Ident),

    #[error("free variable `{0}` has no binding at the closure construction site")]
    UnboundFreeVariable(Ident),
}

type LowerResult<T> = Result<T, LowerError>;

/// Temp allocator for one function body.
#[derive(Debug, Default)]
struct Frame {
    next_temp: Temp,
}

impl Frame {
    fn fresh(&mut self) -> Temp {
        let temp = self.next_temp;
        self.next_temp += 1;
        temp
    }
}

/// Conversion session: owns the function-index counter and the lifted functions.
#[derive(Debug)]
pub struct ClosureConverter {
    next_fun: u32,
    funs: Vec<IrFun>,
}

impl Default for ClosureConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosureConverter {
    pub fn new() -> Self {
        Self {
            next_fun: BUILTINS.len() as u32,
            funs: Vec::new(),
        }
    }

    /// Lower a whole program. The builtins are bound to the entry point's first temps.
    pub fn convert(mut self, expr: &Expr) -> LowerResult<IrModule> {
        let mut frame = Frame::default();
        let env: Scope<Temp> = BUILTINS
            .iter()
            .map(|name| (*name, frame.fresh()))
            .collect();
        let main = self.lower(expr, &env, &mut frame)?;
        Ok(IrModule {
            main,
            funs: self.funs,
            temp_count: frame.next_temp,
        })
    }

    fn lower(&mut self, expr: &Expr, env: &Scope<Temp>, frame: &mut Frame) -> LowerResult<Ir> {
        match expr {
            Expr::Int(n) => Ok(Ir::Int(*n)),
            Expr::Bool(b) => Ok(Ir::Bool(*b)),
            Expr::Unit => Ok(Ir::Unit),

            Expr::Var(name) => env
                .lookup(name)
                .map(|temp| Ir::Var(*temp))
                .ok_or_else(|| LowerError::UnboundVariable(name.clone())),

            Expr::Let { name, value, body } => {
                let temp = frame.fresh();
                let value = self.lower(value, env, frame)?;
                let body = self.lower(body, &env.extend(name.clone(), temp), frame)?;
                Ok(Ir::let_(temp, value, body))
            }

            Expr::LetRec {
                name,
                param,
                body,
                rest,
            } => {
                let temp = frame.fresh();
                let env = env.extend(name.clone(), temp);
                let closure = self.lower_fun(Some(name), param, body, &env)?;
                let rest = self.lower(rest, &env, frame)?;
                Ok(Ir::let_(temp, closure, rest))
            }

            Expr::Fun { param, body } => self.lower_fun(None, param, body, env),

            Expr::App { callee, arg } => {
                let closure = frame.fresh();
                let arg_temp = frame.fresh();
                let callee = self.lower(callee, env, frame)?;
                let arg = self.lower(arg, env, frame)?;
                Ok(Ir::let_(
                    closure,
                    callee,
                    Ir::let_(arg_temp, arg, Ir::Call { closure, arg: arg_temp }),
                ))
            }

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => Ok(Ir::If {
                cond: Box::new(self.lower(cond, env, frame)?),
                then_branch: Box::new(self.lower(then_branch, env, frame)?),
                else_branch: Box::new(self.lower(else_branch, env, frame)?),
            }),

            Expr::Prim { op, left, right } => Ok(Ir::Prim {
                op: *op,
                left: Box::new(self.lower(left, env, frame)?),
                right: Box::new(self.lower(right, env, frame)?),
            }),

            // Temps are taken from the last element backwards so the nested lets,
            // once unwound, still evaluate the elements left to right.
            Expr::Tuple(elts) => {
                let mut temps = vec![0; elts.len()];
                let mut lowered = Vec::with_capacity(elts.len());
                for (i, elt) in elts.iter().enumerate().rev() {
                    temps[i] = frame.fresh();
                    lowered.push((temps[i], self.lower(elt, env, frame)?));
                }
                Ok(lowered
                    .into_iter()
                    .fold(Ir::Tuple(temps), |body, (temp, value)| Ir::let_(temp, value, body)))
            }
        }
    }

    /// Lift `fun param -> body` (named `name` when it comes from `let rec`) and return
    /// the closure construction for the call site, capturing from `env`.
    fn lower_fun(
        &mut self,
        name: Option<&Ident>,
        param: &Ident,
        body: &Expr,
        env: &Scope<Temp>,
    ) -> LowerResult<Ir> {
        let index = self.next_fun;
        self.next_fun += 1;

        let mut captured = free_vars(body);
        captured.remove(param);
        if let Some(name) = name {
            captured.remove(name);
        }
        let captured: Vec<Ident> = captured.into_iter().collect();

        let mut frame = Frame::default();
        let param_temp = frame.fresh();
        let env_temp = frame.fresh();
        let self_temp = name.map(|_| frame.fresh());
        let capture_temps: Vec<Temp> = captured.iter().map(|_| frame.fresh()).collect();

        // The parameter shadows the function's own name, as it does for the type checker.
        let mut inner = Scope::new();
        for (name, temp) in captured.iter().zip(&capture_temps) {
            inner = inner.extend(name.clone(), *temp);
        }
        if let (Some(name), Some(temp)) = (name, self_temp) {
            inner = inner.extend(name.clone(), temp);
        }
        let inner = inner.extend(param.clone(), param_temp);

        let mut lowered = self.lower(body, &inner, &mut frame)?;
        if let Some(temp) = self_temp {
            let self_closure = Ir::MakeClosure {
                fun: index,
                captures: capture_temps.clone(),
            };
            lowered = Ir::let_(temp, self_closure, lowered);
        }
        for (slot, temp) in capture_temps.iter().enumerate().rev() {
            let proj = Ir::Proj {
                tuple: env_temp,
                index: slot as u32,
            };
            lowered = Ir::let_(*temp, proj, lowered);
        }

        let captures = captured
            .iter()
            .map(|name| {
                env.lookup(name)
                    .copied()
                    .ok_or_else(|| LowerError::UnboundFreeVariable(name.clone()))
            })
            .collect::<LowerResult<Vec<Temp>>>()?;

        self.funs.push(IrFun {
            index,
            param: param_temp,
            env: env_temp,
            body: lowered,
            free: captured,
            frame_size: frame.next_temp,
        });
        Ok(Ir::MakeClosure { fun: index, captures })
    }
}

/// Closure-convert a program in a fresh session.
#[instrument(skip_all)]
pub fn to_ir(expr: &Expr) -> LowerResult<IrModule> {
    let module = ClosureConverter::new().convert(expr)?;
    debug!(
        lifted = module.funs.len(),
        main_temps = module.temp_count,
        main_nodes = module.main.size(),
        "closure conversion finished"
    );
    Ok(module)
}
