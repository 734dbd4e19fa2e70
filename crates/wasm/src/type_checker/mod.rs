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

//! Hindley-Milner inference (Algorithm W).
//!
//! The checker only accepts or rejects a tree and reports its principal type; it never
//! rewrites the tree. Code generation runs on the same [`Expr`] afterwards.

mod env;
mod subst;
mod unify;

pub use env::TypeEnv;
pub use subst::{compose, Subst};
pub use unify::unify;

use ast::{BinOp, Expr};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::types::{Scheme, Ty, TyVar};

// ─── Error types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    /// Binding the variable would build an infinite type.
    #[error("cannot construct the infinite type 't{var} = {ty}")]
    OccursCheck { var: TyVar, ty: Ty },

    #[error("type mismatch in {context}: expected {expected}, found {actual}")]
    Mismatch {
        expected: Ty,
        actual: Ty,
        context: &'static str,
    },

    #[error("operator {op} expects int operands, found {left} and {right}")]
    PrimOpType { op: BinOp, left: Ty, right: Ty },
}

pub type InferResult = Result<(Subst, Ty), TypeError>;

// ─── Checker ─────────────────────────────────────────────────────────────────

/// Inference session. Owns the fresh type-variable counter, so two sessions never
/// share state and a session can check any number of expressions.
#[derive(Debug, Default)]
pub struct TypeChecker {
    next_var: TyVar,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> Ty {
        let var = self.next_var;
        self.next_var += 1;
        Ty::Var(var)
    }

    /// Replaces each quantified variable with a fresh one.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Ty {
        if scheme.vars.is_empty() {
            return scheme.ty.clone();
        }
        let renaming = scheme
            .vars
            .iter()
            .fold(Subst::empty(), |acc, var| {
                let fresh = self.fresh();
                compose(&Subst::singleton(*var, fresh), &acc)
            });
        renaming.apply(&scheme.ty)
    }

    /// Principal type of a closed program, checked against the builtin environment.
    pub fn type_of(&mut self, expr: &Expr) -> Result<Ty, TypeError> {
        let (subst, ty) = self.infer(&TypeEnv::initial(), expr)?;
        Ok(subst.apply(&ty))
    }

    pub fn infer(&mut self, env: &TypeEnv, expr: &Expr) -> InferResult {
        match expr {
            Expr::Int(_) => Ok((Subst::empty(), Ty::Int)),
            Expr::Bool(_) => Ok((Subst::empty(), Ty::Bool)),
            Expr::Unit => Ok((Subst::empty(), Ty::Unit)),

            Expr::Var(name) => {
                let scheme = env
                    .lookup(name)
                    .ok_or_else(|| TypeError::UnboundVariable(name.clone()))?;
                Ok((Subst::empty(), self.instantiate(scheme)))
            }

            Expr::Prim { op, left, right } => self.infer_prim(env, *op, left, right),

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let (s1, cond_ty) = self.infer(env, cond)?;
                let s_bool = unify(&Ty::Bool, &cond_ty, "if condition")?;
                let s1 = compose(&s_bool, &s1);

                let env1 = env.apply(&s1);
                let (s2, then_ty) = self.infer(&env1, then_branch)?;
                let env2 = env1.apply(&s2);
                let (s3, else_ty) = self.infer(&env2, else_branch)?;

                let s4 = unify(&s3.apply(&then_ty), &else_ty, "if branches")?;
                let subst = compose(&s4, &compose(&s3, &compose(&s2, &s1)));
                let ty = subst.apply(&then_ty);
                Ok((subst, ty))
            }

            Expr::Fun { param, body } => {
                let param_ty = self.fresh();
                let inner = env.extend(param.clone(), Scheme::mono(param_ty.clone()));
                let (subst, body_ty) = self.infer(&inner, body)?;
                let ty = Ty::fun(subst.apply(&param_ty), body_ty);
                Ok((subst, ty))
            }

            Expr::App { callee, arg } => {
                let (s1, callee_ty) = self.infer(env, callee)?;
                let (s2, arg_ty) = self.infer(&env.apply(&s1), arg)?;
                let result = self.fresh();
                let s3 = unify(
                    &s2.apply(&callee_ty),
                    &Ty::fun(arg_ty, result.clone()),
                    "application",
                )?;
                let subst = compose(&s3, &compose(&s2, &s1));
                let ty = subst.apply(&result);
                Ok((subst, ty))
            }

            Expr::Let { name, value, body } => {
                let (s1, value_ty) = self.infer(env, value)?;
                let env1 = env.apply(&s1);
                let scheme = env1.generalize(&value_ty);
                let (s2, body_ty) = self.infer(&env1.extend(name.clone(), scheme), body)?;
                let subst = compose(&s2, &s1);
                let ty = subst.apply(&body_ty);
                Ok((subst, ty))
            }

            Expr::LetRec {
                name,
                param,
                body,
                rest,
            } => {
                let domain = self.fresh();
                let codomain = self.fresh();
                let fn_ty = Ty::fun(domain.clone(), codomain.clone());

                // Monomorphic inside its own body
                let inner = env
                    .extend(name.clone(), Scheme::mono(fn_ty.clone()))
                    .extend(param.clone(), Scheme::mono(domain));
                let (s1, body_ty) = self.infer(&inner, body)?;
                let s2 = unify(&s1.apply(&codomain), &body_ty, "let rec body")?;
                let s = compose(&s2, &s1);

                let outer = env.apply(&s);
                let scheme = outer.generalize(&s.apply(&fn_ty));
                let (s3, rest_ty) = self.infer(&outer.extend(name.clone(), scheme), rest)?;
                let subst = compose(&s3, &s);
                let ty = subst.apply(&rest_ty);
                Ok((subst, ty))
            }

            Expr::Tuple(elts) => {
                let mut subst = Subst::empty();
                let mut env = env.clone();
                let mut tys = Vec::with_capacity(elts.len());
                for elt in elts {
                    let (s, ty) = self.infer(&env, elt)?;
                    env = env.apply(&s);
                    subst = compose(&s, &subst);
                    tys.push(ty);
                }
                let ty = Ty::Tuple(tys.iter().map(|ty| subst.apply(ty)).collect());
                Ok((subst, ty))
            }
        }
    }

    /// Both operands must be `int`. On failure the error shows the operator and both
    /// operand types as far as they are known, rather than the inner mismatch.
    fn infer_prim(&mut self, env: &TypeEnv, op: BinOp, left: &Expr, right: &Expr) -> InferResult {
        let (s1, left_ty) = self.infer(env, left)?;
        let (s2, right_ty) = self.infer(&env.apply(&s1), right)?;
        let subst = compose(&s2, &s1);

        let operands = unify(&Ty::Int, &s2.apply(&left_ty), "prim left").and_then(|s3| {
            let s4 = unify(&Ty::Int, &s3.apply(&right_ty), "prim right")?;
            Ok(compose(&s4, &s3))
        });
        let subst = match operands {
            Ok(s) => compose(&s, &subst),
            Err(_) => {
                return Err(TypeError::PrimOpType {
                    op,
                    left: subst.apply(&left_ty),
                    right: subst.apply(&right_ty),
                })
            }
        };

        let result = if op.is_arithmetic() { Ty::Int } else { Ty::Bool };
        Ok((subst, result))
    }
}

/// Principal type of `expr` under the builtin environment, in a fresh session.
#[instrument(skip_all)]
pub fn type_of(expr: &Expr) -> Result<Ty, TypeError> {
    let ty = TypeChecker::new().type_of(expr)?;
    debug!(%ty, "inferred principal type");
    Ok(ty)
}
