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

use std::collections::BTreeSet;

use ast::{Scope, BUILTINS};

use super::subst::Subst;
use crate::types::{Scheme, Ty, TyVar};

/// Identifier to scheme mapping. Extending never touches the parent, so sibling
/// subexpressions are checked against the same environment.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    scope: Scope<Scheme>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host builtins, monomorphic, in table order.
    pub fn initial() -> Self {
        BUILTINS
            .iter()
            .zip(builtin_types())
            .fold(TypeEnv::new(), |env, (name, ty)| env.extend(*name, Scheme::mono(ty)))
    }

    pub fn extend(&self, name: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            scope: self.scope.extend(name, scheme),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        self.scope.lookup(name)
    }

    pub fn apply(&self, subst: &Subst) -> Self {
        if subst.is_empty() {
            return self.clone();
        }
        Self {
            scope: self.scope.map(|scheme| subst.apply_scheme(scheme)),
        }
    }

    pub fn free_vars(&self) -> BTreeSet<TyVar> {
        self.scope
            .visible()
            .flat_map(|(_, scheme)| scheme.free_vars())
            .collect()
    }

    /// Quantifies every variable of `ty` that no binding in scope mentions.
    pub fn generalize(&self, ty: &Ty) -> Scheme {
        let env_vars = self.free_vars();
        Scheme {
            vars: ty.free_vars().difference(&env_vars).copied().collect(),
            ty: ty.clone(),
        }
    }
}

fn builtin_types() -> [Ty; 4] {
    [
        Ty::fun(Ty::Int, Ty::Unit),
        Ty::fun(Ty::Bool, Ty::Unit),
        Ty::fun(Ty::Unit, Ty::Unit),
        Ty::fun(Ty::Unit, Ty::Int),
    ]
}
