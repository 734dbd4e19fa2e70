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

use super::TypeError;
use super::subst::{compose, Subst};
use crate::types::{Ty, TyVar};

/// Most general unifier of `expected` and `actual`. `context` names the construct
/// that demanded the two types agree and ends up in any `Mismatch`.
pub fn unify(expected: &Ty, actual: &Ty, context: &'static str) -> Result<Subst, TypeError> {
    match (expected, actual) {
        (Ty::Fun(d1, c1), Ty::Fun(d2, c2)) => {
            let s1 = unify(d1, d2, context)?;
            let s2 = unify(&s1.apply(c1), &s1.apply(c2), context)?;
            Ok(compose(&s2, &s1))
        }
        (Ty::Tuple(xs), Ty::Tuple(ys)) => {
            if xs.len() != ys.len() {
                return Err(mismatch(expected, actual, context));
            }
            xs.iter().zip(ys).try_fold(Subst::empty(), |subst, (x, y)| {
                let step = unify(&subst.apply(x), &subst.apply(y), context)?;
                Ok(compose(&step, &subst))
            })
        }
        (Ty::Var(var), other) | (other, Ty::Var(var)) => bind(*var, other),
        (Ty::Int, Ty::Int) | (Ty::Bool, Ty::Bool) | (Ty::Unit, Ty::Unit) => Ok(Subst::empty()),
        _ => Err(mismatch(expected, actual, context)),
    }
}

fn bind(var: TyVar, ty: &Ty) -> Result<Subst, TypeError> {
    if *ty == Ty::Var(var) {
        return Ok(Subst::empty());
    }
    if ty.occurs(var) {
        return Err(TypeError::OccursCheck {
            var,
            ty: ty.clone(),
        });
    }
    Ok(Subst::singleton(var, ty.clone()))
}

fn mismatch(expected: &Ty, actual: &Ty, context: &'static str) -> TypeError {
    TypeError::Mismatch {
        expected: expected.clone(),
        actual: actual.clone(),
        context,
    }
}
