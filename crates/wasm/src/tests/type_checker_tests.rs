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

use ast::{BinOp, Expr};

use crate::type_checker::{compose, type_of, unify, Subst, TypeChecker, TypeEnv, TypeError};
use crate::types::{Scheme, Ty};

// ─── Helper builders ──────────────────────────────────────────────────────────

fn check(source: &str) -> Result<Ty, TypeError> {
    let expr = parser::parse(source).expect("parse failed");
    type_of(&expr)
}

fn check_ok(source: &str) -> Ty {
    check(source).expect("type check should succeed")
}

// ─── Accepted programs ────────────────────────────────────────────────────────

#[test]
fn test_arithmetic_and_comparison() {
    assert_eq!(check_ok("1 + 2"), Ty::Int);
    assert_eq!(check_ok("3 * 4 - 1"), Ty::Int);
    assert_eq!(check_ok("1 < 2"), Ty::Bool);
    assert_eq!(check_ok("1 = 2"), Ty::Bool);
}

#[test]
fn test_if_expression() {
    assert_eq!(check_ok("if true then 1 else 2"), Ty::Int);
    assert_eq!(check_ok("if 1 <= 2 then () else ()"), Ty::Unit);
}

#[test]
fn test_let_polymorphism_separate_uses() {
    assert_eq!(check_ok("let id = fun x -> x in id 3"), Ty::Int);
    assert_eq!(check_ok("let id = fun x -> x in id true"), Ty::Bool);
}

#[test]
fn test_let_polymorphism_in_one_tuple() {
    assert_eq!(
        check_ok("let id = fun x -> x in (id 1, id true)"),
        Ty::Tuple(vec![Ty::Int, Ty::Bool])
    );
}

#[test]
fn test_let_rec() {
    assert_eq!(
        check_ok("let rec f n = if n<=1 then n else f (n-1) in f 10"),
        Ty::Int
    );
    assert_eq!(
        check_ok("let rec fib n = if n <= 1 then n else fib (n - 1) + fib (n - 2) in fib"),
        Ty::fun(Ty::Int, Ty::Int)
    );
}

#[test]
fn test_let_rec_is_generalized_for_the_continuation() {
    assert_eq!(
        check_ok("let rec id x = x in (id 1, id true)"),
        Ty::Tuple(vec![Ty::Int, Ty::Bool])
    );
}

#[test]
fn test_builtins() {
    assert_eq!(check_ok("print_int 41"), Ty::Unit);
    assert_eq!(check_ok("print_bool false"), Ty::Unit);
    assert_eq!(check_ok("print_unit ()"), Ty::Unit);
    assert_eq!(check_ok("now_ms ()"), Ty::Int);
}

#[test]
fn test_higher_order_composition() {
    let ty = check_ok("let compose f g = fun x -> f (g x) in compose");
    // ('b -> 'c) -> ('a -> 'b) -> 'a -> 'c
    let (a, b, c) = (Ty::Var(100), Ty::Var(101), Ty::Var(102));
    let expected = Ty::fun(
        Ty::fun(b.clone(), c.clone()),
        Ty::fun(Ty::fun(a.clone(), b), Ty::fun(a, c)),
    );
    assert!(ty.alpha_eq(&expected), "got {ty}");
}

#[test]
fn test_identity_display() {
    assert_eq!(check_ok("fun x -> x").to_string(), "'t0 -> 't0");
}

// ─── Rejected programs ────────────────────────────────────────────────────────

#[test]
fn test_if_branch_mismatch() {
    assert_eq!(
        check("if true then 1 else false"),
        Err(TypeError::Mismatch {
            expected: Ty::Int,
            actual: Ty::Bool,
            context: "if branches",
        })
    );
}

#[test]
fn test_if_condition_must_be_bool() {
    assert!(matches!(
        check("if 1 then 2 else 3"),
        Err(TypeError::Mismatch { context: "if condition", expected: Ty::Bool, actual: Ty::Int })
    ));
}

#[test]
fn test_unbound_variable() {
    assert_eq!(check("x + 1"), Err(TypeError::UnboundVariable("x".to_string())));
}

#[test]
fn test_occurs_check() {
    assert!(matches!(
        check("let rec f x = f x f in f"),
        Err(TypeError::OccursCheck { .. })
    ));
    assert!(matches!(check("fun x -> x x"), Err(TypeError::OccursCheck { .. })));
}

#[test]
fn test_prim_op_reports_both_operands() {
    assert_eq!(
        check("1 + true"),
        Err(TypeError::PrimOpType {
            op: BinOp::Add,
            left: Ty::Int,
            right: Ty::Bool,
        })
    );
    assert!(matches!(
        check("() < 2"),
        Err(TypeError::PrimOpType { op: BinOp::Lt, left: Ty::Unit, right: Ty::Int })
    ));
}

#[test]
fn test_application_mismatch() {
    assert_eq!(
        check("print_int true"),
        Err(TypeError::Mismatch {
            expected: Ty::Int,
            actual: Ty::Bool,
            context: "application",
        })
    );
}

#[test]
fn test_lambda_parameters_stay_monomorphic() {
    assert!(matches!(
        check("fun f -> (f 1, f true)"),
        Err(TypeError::Mismatch { context: "application", .. })
    ));
}

#[test]
fn test_error_messages_render_types() {
    let err = check("print_bool (1, ())").unwrap_err();
    assert_eq!(
        err.to_string(),
        "type mismatch in application: expected bool, found (int, unit)"
    );
}

// ─── Substitution, unification, environments ─────────────────────────────────

#[test]
fn test_compose_applies_later_substitution_through_earlier() {
    let s1 = Subst::singleton(0, Ty::Var(1));
    let s2 = Subst::singleton(1, Ty::Int);
    let composed = compose(&s2, &s1);
    assert_eq!(composed.get(0), Some(&Ty::Int));
    assert_eq!(composed.get(1), Some(&Ty::Int));
}

#[test]
fn test_compose_prefers_later_bindings() {
    let s1 = Subst::singleton(0, Ty::Int);
    let s2 = Subst::singleton(0, Ty::Bool);
    assert_eq!(compose(&s2, &s1).get(0), Some(&Ty::Bool));
}

#[test]
fn test_unify_functions_and_tuples() {
    let s = unify(
        &Ty::fun(Ty::Var(0), Ty::Var(0)),
        &Ty::fun(Ty::Int, Ty::Var(1)),
        "test",
    )
    .expect("should unify");
    assert_eq!(s.apply(&Ty::Var(1)), Ty::Int);

    assert!(matches!(
        unify(
            &Ty::Tuple(vec![Ty::Int]),
            &Ty::Tuple(vec![Ty::Int, Ty::Int]),
            "test"
        ),
        Err(TypeError::Mismatch { .. })
    ));
    assert_eq!(unify(&Ty::Var(3), &Ty::Var(3), "test"), Ok(Subst::empty()));
}

#[test]
fn test_generalize_skips_variables_free_in_env() {
    let env = TypeEnv::new().extend("x", Scheme::mono(Ty::Var(0)));
    let scheme = env.generalize(&Ty::fun(Ty::Var(0), Ty::Var(1)));
    assert_eq!(scheme.vars, vec![1]);
}

#[test]
fn test_apply_leaves_quantified_variables() {
    let scheme = Scheme {
        vars: vec![0],
        ty: Ty::fun(Ty::Var(0), Ty::Var(1)),
    };
    let subst = compose(&Subst::singleton(0, Ty::Int), &Subst::singleton(1, Ty::Bool));
    assert_eq!(
        subst.apply_scheme(&scheme).ty,
        Ty::fun(Ty::Var(0), Ty::Bool)
    );
}

#[test]
fn test_rechecking_yields_equivalent_types() {
    let expr = parser::parse("let pair = fun a -> fun b -> (b, a) in pair").expect("parse failed");
    let mut checker = TypeChecker::new();
    let first = checker.type_of(&expr).expect("first run");
    let second = checker.type_of(&expr).expect("second run");
    assert_ne!(first, second);
    assert!(first.alpha_eq(&second));
}

#[test]
fn test_checker_does_not_rewrite_tree() {
    let expr = Expr::let_("x", Expr::Int(1), Expr::var("x"));
    let before = expr.clone();
    assert_eq!(type_of(&expr), Ok(Ty::Int));
    assert_eq!(expr, before);
}

#[test]
fn test_type_display() {
    let ty = Ty::fun(
        Ty::fun(Ty::Int, Ty::Int),
        Ty::Tuple(vec![Ty::Bool, Ty::Unit, Ty::Var(7)]),
    );
    assert_eq!(ty.to_string(), "(int -> int) -> (bool, unit, 't7)");
    assert_eq!(
        Ty::fun(Ty::Int, Ty::fun(Ty::Int, Ty::Int)).to_string(),
        "int -> int -> int"
    );
}
