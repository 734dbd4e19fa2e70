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

//! Reference tree-walking interpreter. It runs the source tree directly and is
//! the oracle the compiled output is checked against.

mod continuation;
mod prim;
pub mod value;

use std::rc::Rc;

use ast::Expr;
use tracing::{debug, instrument};

use crate::builtin::globals::register_globals;
use crate::error::RuntimeError;
use crate::host::Host;

use continuation::Continuation;

pub use prim::eval_prim;
pub use value::{Closure, Env, NativeFn, Value};

/// Deepest continuation stack before evaluation gives up.
pub const MAX_EVAL_DEPTH: usize = 1_000_000;

enum Step<'a> {
    Eval(&'a Expr, Env<'a>),
    Return(Value<'a>),
}

pub struct Interpreter<'h> {
    host: &'h mut dyn Host,
    max_depth: usize,
}

impl<'h> Interpreter<'h> {
    pub fn new(host: &'h mut dyn Host) -> Self {
        Self::with_max_depth(host, MAX_EVAL_DEPTH)
    }

    pub fn with_max_depth(host: &'h mut dyn Host, max_depth: usize) -> Self {
        Self { host, max_depth }
    }

    /// Evaluates `expr` in `env`.
    ///
    /// Pending work lives on an explicit continuation stack, so non-tail
    /// recursion is bounded by `max_depth` rather than the native stack. Tail
    /// positions (the body of a `let`, the rest of a `let rec`, both `if` arms
    /// and the body of an applied closure) pop their continuation before they
    /// run, so tail-recursive programs run in constant space.
    pub fn eval<'a>(&mut self, expr: &'a Expr, env: &Env<'a>) -> Result<Value<'a>, RuntimeError> {
        let mut stack: Vec<Continuation<'a>> = Vec::new();
        let mut step = Step::Eval(expr, env.clone());
        loop {
            step = match step {
                Step::Eval(expr, env) => self.eval_step(expr, env, &mut stack)?,
                Step::Return(value) => match stack.pop() {
                    None => return Ok(value),
                    Some(next) => self.resume(next, value, &mut stack)?,
                },
            };
            if stack.len() > self.max_depth {
                return Err(RuntimeError::StackExhausted(self.max_depth));
            }
        }
    }

    fn eval_step<'a>(
        &mut self,
        expr: &'a Expr,
        env: Env<'a>,
        stack: &mut Vec<Continuation<'a>>,
    ) -> Result<Step<'a>, RuntimeError> {
        Ok(match expr {
            Expr::Int(n) => Step::Return(Value::Int(*n)),
            Expr::Bool(b) => Step::Return(Value::Bool(*b)),
            Expr::Unit => Step::Return(Value::Unit),
            Expr::Var(name) => {
                let value = env
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnboundVariable(name.clone()))?;
                Step::Return(value)
            }
            Expr::Let { name, value, body } => {
                stack.push(Continuation::LetBody {
                    name,
                    body,
                    env: env.clone(),
                });
                Step::Eval(value, env)
            }
            Expr::LetRec {
                name,
                param,
                body,
                rest,
            } => {
                let closure = Value::closure(param, body, env.clone(), Some(name));
                Step::Eval(rest, env.extend(name.as_str(), closure))
            }
            Expr::Fun { param, body } => Step::Return(Value::closure(param, body, env, None)),
            Expr::App { callee, arg } => {
                stack.push(Continuation::AppArg {
                    arg,
                    env: env.clone(),
                });
                Step::Eval(callee, env)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                stack.push(Continuation::IfBranch {
                    then_branch,
                    else_branch,
                    env: env.clone(),
                });
                Step::Eval(cond, env)
            }
            Expr::Prim { op, left, right } => {
                stack.push(Continuation::PrimRight {
                    op: *op,
                    right,
                    env: env.clone(),
                });
                Step::Eval(left, env)
            }
            Expr::Tuple(elts) => match elts.split_first() {
                Some((first, rest)) => {
                    stack.push(Continuation::TupleRest {
                        rest,
                        done: Vec::with_capacity(elts.len()),
                        env: env.clone(),
                    });
                    Step::Eval(first, env)
                }
                None => Step::Return(Value::Tuple(Rc::from(Vec::new()))),
            },
        })
    }

    fn resume<'a>(
        &mut self,
        next: Continuation<'a>,
        value: Value<'a>,
        stack: &mut Vec<Continuation<'a>>,
    ) -> Result<Step<'a>, RuntimeError> {
        Ok(match next {
            Continuation::LetBody { name, body, env } => Step::Eval(body, env.extend(name, value)),
            Continuation::AppArg { arg, env } => {
                stack.push(Continuation::AppCall { callee: value });
                Step::Eval(arg, env)
            }
            Continuation::AppCall { callee } => match callee {
                Value::Closure(closure) => Step::Eval(closure.body, Closure::enter(&closure, value)),
                Value::Builtin(native) => Step::Return((native.func)(&value, &mut *self.host)?),
                other => return Err(RuntimeError::NotAFunction(other.to_string())),
            },
            Continuation::IfBranch {
                then_branch,
                else_branch,
                env,
            } => match value {
                Value::Bool(true) => Step::Eval(then_branch, env),
                Value::Bool(false) => Step::Eval(else_branch, env),
                other => return Err(RuntimeError::NonBooleanCondition(other.to_string())),
            },
            Continuation::PrimRight { op, right, env } => {
                stack.push(Continuation::PrimApply { op, left: value });
                Step::Eval(right, env)
            }
            Continuation::PrimApply { op, left } => Step::Return(eval_prim(op, &left, &value)?),
            Continuation::TupleRest { rest, mut done, env } => {
                done.push(value);
                match rest.split_first() {
                    Some((first, rest)) => {
                        stack.push(Continuation::TupleRest {
                            rest,
                            done,
                            env: env.clone(),
                        });
                        Step::Eval(first, env)
                    }
                    None => Step::Return(Value::Tuple(Rc::from(done))),
                }
            }
        })
    }
}

/// Evaluates a closed program with the builtins in scope.
#[instrument(skip_all)]
pub fn eval_expr<'a>(expr: &'a Expr, host: &mut dyn Host) -> Result<Value<'a>, RuntimeError> {
    let env = register_globals();
    let result = Interpreter::new(host).eval(expr, &env);
    match &result {
        Ok(value) => debug!(%value, "evaluation finished"),
        Err(error) => debug!(%error, "evaluation failed"),
    }
    result
}
