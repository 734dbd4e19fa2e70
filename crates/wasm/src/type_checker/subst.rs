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

use std::collections::BTreeMap;

use crate::types::{Scheme, Ty, TyVar};

/// A finite map from type variables to types.
///
/// Bindings may refer to variables bound elsewhere in the same map; [`Subst::apply`]
/// follows such chains until it reaches an unbound variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst {
    bindings: BTreeMap<TyVar, Ty>,
}

impl Subst {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(var: TyVar, ty: Ty) -> Self {
        Self {
            bindings: BTreeMap::from([(var, ty)]),
        }
    }

    pub fn get(&self, var: TyVar) -> Option<&Ty> {
        self.bindings.get(&var)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn apply(&self, ty: &Ty) -> Ty {
        self.apply_except(ty, &[])
    }

    /// Quantified variables are bound by the scheme itself and are left alone.
    pub fn apply_scheme(&self, scheme: &Scheme) -> Scheme {
        Scheme {
            vars: scheme.vars.clone(),
            ty: self.apply_except(&scheme.ty, &scheme.vars),
        }
    }

    fn apply_except(&self, ty: &Ty, skip: &[TyVar]) -> Ty {
        match ty {
            Ty::Int | Ty::Bool | Ty::Unit => ty.clone(),
            Ty::Var(id) if skip.contains(id) => ty.clone(),
            Ty::Var(id) => match self.bindings.get(id) {
                Some(bound) => self.apply_except(bound, skip),
                None => ty.clone(),
            },
            Ty::Fun(domain, codomain) => Ty::fun(
                self.apply_except(domain, skip),
                self.apply_except(codomain, skip),
            ),
            Ty::Tuple(elts) => Ty::Tuple(elts.iter().map(|elt| self.apply_except(elt, skip)).collect()),
        }
    }
}

/// `compose(s2, s1)` applies `s2` through every binding of `s1`, then overlays
/// the bindings of `s2`. Applying the result equals applying `s1` then `s2`.
pub fn compose(s2: &Subst, s1: &Subst) -> Subst {
    let mut bindings: BTreeMap<TyVar, Ty> = s1
        .bindings
        .iter()
        .map(|(var, ty)| (*var, s2.apply(ty)))
        .collect();
    for (var, ty) in &s2.bindings {
        bindings.insert(*var, ty.clone());
    }
    Subst { bindings }
}
