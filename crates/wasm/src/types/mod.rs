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

//! Types inferred for source expressions.

use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a type variable, unique within one [`TypeChecker`](crate::type_checker::TypeChecker).
pub type TyVar = u32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Int,
    Bool,
    Unit,
    /// `domain -> codomain`
    Fun(Box<Ty>, Box<Ty>),
    Tuple(Vec<Ty>),
    Var(TyVar),
}

impl Ty {
    pub fn fun(domain: Ty, codomain: Ty) -> Ty {
        Ty::Fun(Box::new(domain), Box::new(codomain))
    }

    /// Free type variables, in ascending order.
    pub fn free_vars(&self) -> BTreeSet<TyVar> {
        let mut vars = BTreeSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    fn collect_free_vars(&self, vars: &mut BTreeSet<TyVar>) {
        match self {
            Ty::Int | Ty::Bool | Ty::Unit => {}
            Ty::Var(id) => {
                vars.insert(*id);
            }
            Ty::Fun(domain, codomain) => {
                domain.collect_free_vars(vars);
                codomain.collect_free_vars(vars);
            }
            Ty::Tuple(elts) => elts.iter().for_each(|elt| elt.collect_free_vars(vars)),
        }
    }

    pub fn occurs(&self, var: TyVar) -> bool {
        match self {
            Ty::Int | Ty::Bool | Ty::Unit => false,
            Ty::Var(id) => *id == var,
            Ty::Fun(domain, codomain) => domain.occurs(var) || codomain.occurs(var),
            Ty::Tuple(elts) => elts.iter().any(|elt| elt.occurs(var)),
        }
    }

    /// Structural equality up to a consistent renaming of type variables.
    ///
    /// Two runs of inference over the same tree draw different fresh variables,
    /// so principal types are compared with this rather than `==`.
    pub fn alpha_eq(&self, other: &Ty) -> bool {
        fn go(a: &Ty, b: &Ty, left: &mut Vec<(TyVar, TyVar)>) -> bool {
            match (a, b) {
                (Ty::Int, Ty::Int) | (Ty::Bool, Ty::Bool) | (Ty::Unit, Ty::Unit) => true,
                (Ty::Var(x), Ty::Var(y)) => {
                    match left.iter().find(|(l, r)| l == x || r == y) {
                        Some((l, r)) => l == x && r == y,
                        None => {
                            left.push((*x, *y));
                            true
                        }
                    }
                }
                (Ty::Fun(a1, a2), Ty::Fun(b1, b2)) => go(a1, b1, left) && go(a2, b2, left),
                (Ty::Tuple(xs), Ty::Tuple(ys)) => {
                    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| go(x, y, left))
                }
                _ => false,
            }
        }
        go(self, other, &mut Vec::new())
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Bool => write!(f, "bool"),
            Ty::Unit => write!(f, "unit"),
            Ty::Var(id) => write!(f, "'t{id}"),
            // Arrows associate to the right, so only a function domain needs parens.
            Ty::Fun(domain, codomain) => match domain.as_ref() {
                Ty::Fun(..) => write!(f, "({domain}) -> {codomain}"),
                _ => write!(f, "{domain} -> {codomain}"),
            },
            Ty::Tuple(elts) => {
                write!(f, "(")?;
                for (i, elt) in elts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elt}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A type with universally quantified variables, `forall vars. ty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub vars: Vec<TyVar>,
    pub ty: Ty,
}

impl Scheme {
    /// A scheme with nothing quantified.
    pub fn mono(ty: Ty) -> Self {
        Self {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn free_vars(&self) -> BTreeSet<TyVar> {
        let mut vars = self.ty.free_vars();
        for var in &self.vars {
            vars.remove(var);
        }
        vars
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vars.is_empty() {
            return write!(f, "{}", self.ty);
        }
        write!(f, "forall")?;
        for var in &self.vars {
            write!(f, " 't{var}")?;
        }
        write!(f, ". {}", self.ty)
    }
}
