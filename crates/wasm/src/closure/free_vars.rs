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

use ast::{Expr, Ident};

/// Names referenced by `expr` but not bound inside it, in sorted order.
pub fn free_vars(expr: &Expr) -> BTreeSet<Ident> {
    let mut free = BTreeSet::new();
    collect(expr, &mut free);
    free
}

fn collect(expr: &Expr, free: &mut BTreeSet<Ident>) {
    match expr {
        Expr::Int(_) | Expr::Bool(_) | Expr::Unit => {}
        Expr::Var(name) => {
            free.insert(name.clone());
        }
        Expr::Let { name, value, body } => {
            collect(value, free);
            free.extend(without(free_vars(body), &[name]));
        }
        Expr::LetRec {
            name,
            param,
            body,
            rest,
        } => {
            free.extend(without(free_vars(body), &[name, param]));
            free.extend(without(free_vars(rest), &[name]));
        }
        Expr::Fun { param, body } => {
            free.extend(without(free_vars(body), &[param]));
        }
        Expr::App { callee, arg } => {
            collect(callee, free);
            collect(arg, free);
        }
        Expr::If {
            cond,
            then_branch,
            else_branch,
        } => {
            collect(cond, free);
            collect(then_branch, free);
            collect(else_branch, free);
        }
        Expr::Prim { left, right, .. } => {
            collect(left, free);
            collect(right, free);
        }
        Expr::Tuple(elts) => elts.iter().for_each(|elt| collect(elt, free)),
    }
}

fn without(mut set: BTreeSet<Ident>, bound: &[&Ident]) -> BTreeSet<Ident> {
    for name in bound {
        set.remove(name.as_str());
    }
    set
}
