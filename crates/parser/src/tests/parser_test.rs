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

use crate::{parse, ParseError};

fn int(n: i32) -> Expr {
    Expr::Int(n)
}

fn var(name: &str) -> Expr {
    Expr::var(name)
}

fn app(callee: Expr, arg: Expr) -> Expr {
    Expr::app(callee, arg)
}

fn prim(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::prim(op, left, right)
}

fn parse_ok(source: &str) -> Expr {
    parse(source).expect("parse failed")
}

// ─── Constructs ───────────────────────────────────────────────────────────────

#[test]
fn test_let_with_addition() {
    assert_eq!(
        parse_ok("let x = 1 in x+2"),
        Expr::let_("x", int(1), prim(BinOp::Add, var("x"), int(2)))
    );
}

#[test]
fn test_literals() {
    assert_eq!(parse_ok("42"), int(42));
    assert_eq!(parse_ok("true"), Expr::Bool(true));
    assert_eq!(parse_ok("false"), Expr::Bool(false));
    assert_eq!(parse_ok("()"), Expr::Unit);
    assert_eq!(parse_ok("(7)"), int(7));
    assert_eq!(parse_ok("_tmp1"), var("_tmp1"));
}

#[test]
fn test_fib_let_rec() {
    let src = "let rec f n = if n<=1 then n else (f (n-1)) + (f (n-2)) in f 5";
    let call = |k| app(var("f"), prim(BinOp::Sub, var("n"), int(k)));
    let expected = Expr::let_rec(
        "f",
        "n",
        Expr::if_(
            prim(BinOp::Le, var("n"), int(1)),
            var("n"),
            prim(BinOp::Add, call(1), call(2)),
        ),
        app(var("f"), int(5)),
    );
    assert_eq!(parse_ok(src), expected);
}

#[test]
fn test_nested_tuple() {
    assert_eq!(
        parse_ok("(1, (2, 3))"),
        Expr::Tuple(vec![int(1), Expr::Tuple(vec![int(2), int(3)])])
    );
}

#[test]
fn test_fun() {
    assert_eq!(
        parse_ok("fun x -> x * 2"),
        Expr::fun("x", prim(BinOp::Mul, var("x"), int(2)))
    );
}

#[test]
fn test_application_is_left_associative() {
    assert_eq!(parse_ok("f x y"), app(app(var("f"), var("x")), var("y")));
}

#[test]
fn test_application_binds_tighter_than_arithmetic() {
    assert_eq!(
        parse_ok("f x + g y"),
        prim(
            BinOp::Add,
            app(var("f"), var("x")),
            app(var("g"), var("y"))
        )
    );
    assert_eq!(
        parse_ok("f x * 2 <= g y"),
        prim(
            BinOp::Le,
            prim(BinOp::Mul, app(var("f"), var("x")), int(2)),
            app(var("g"), var("y"))
        )
    );
}

#[test]
fn test_precedence_and_associativity() {
    // 1 + 2 * 3 - 4
    assert_eq!(
        parse_ok("1 + 2 * 3 - 4"),
        prim(
            BinOp::Sub,
            prim(BinOp::Add, int(1), prim(BinOp::Mul, int(2), int(3))),
            int(4)
        )
    );
    // comparisons fold left
    assert_eq!(
        parse_ok("a < b = c"),
        prim(BinOp::Eq, prim(BinOp::Lt, var("a"), var("b")), var("c"))
    );
}

#[test]
fn test_let_with_params_desugars_to_lambdas() {
    assert_eq!(
        parse_ok("let add a b = a + b in add 1 2"),
        Expr::let_(
            "add",
            Expr::fun("a", Expr::fun("b", prim(BinOp::Add, var("a"), var("b")))),
            app(app(var("add"), int(1)), int(2))
        )
    );
}

#[test]
fn test_let_rec_curries_remaining_params() {
    let src = "let rec sum n acc = if n <= 0 then acc else sum (n - 1) (acc + n) in sum 10 0";
    let expected = Expr::let_rec(
        "sum",
        "n",
        Expr::fun(
            "acc",
            Expr::if_(
                prim(BinOp::Le, var("n"), int(0)),
                var("acc"),
                app(
                    app(var("sum"), prim(BinOp::Sub, var("n"), int(1))),
                    prim(BinOp::Add, var("acc"), var("n")),
                ),
            ),
        ),
        app(app(var("sum"), int(10)), int(0)),
    );
    assert_eq!(parse_ok(src), expected);
}

#[test]
fn test_multiline_source() {
    let src = "let a = 1 in\n  let b = 2 in\n    (a, b, ())";
    assert_eq!(
        parse_ok(src),
        Expr::let_(
            "a",
            int(1),
            Expr::let_("b", int(2), Expr::Tuple(vec![var("a"), var("b"), Expr::Unit]))
        )
    );
}

#[test]
fn test_display_round_trip() {
    let sources = [
        "let rec fib n = if n <= 1 then n else fib (n - 1) + fib (n - 2) in fib 10",
        "let compose f g = fun x -> f (g x) in compose (fun a -> a + 1) (fun b -> b * 2) 5",
        "let p = (1, (true, ())) in p",
        "(fun x -> x) 1 - (2 - 3)",
    ];
    for src in sources {
        let expr = parse_ok(src);
        assert_eq!(parse_ok(&expr.to_string()), expr, "round trip of {src}");
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn test_missing_body_reports_eof_position() {
    let err = parse("let x = 1 in").unwrap_err();
    assert_eq!((err.line(), err.col()), (1, 13));
    assert_eq!(err.token(), "<eof>");
    assert!(matches!(err, ParseError::UnexpectedToken { context: "atom", .. }));
}

#[test]
fn test_missing_in() {
    let err = parse("let x = 1 x").unwrap_err();
    assert_eq!(
        err,
        ParseError::Expected {
            line: 1,
            col: 12,
            expected: "in",
            found: "<eof>".to_string(),
            context: "let binding",
        }
    );
}

#[test]
fn test_missing_else() {
    let err = parse("if true then 1").unwrap_err();
    assert!(matches!(err, ParseError::Expected { expected: "else", col: 15, .. }));
}

#[test]
fn test_missing_arrow() {
    let err = parse("fun x x").unwrap_err();
    assert!(matches!(err, ParseError::Expected { expected: "->", .. }));
    assert_eq!(err.token(), "x");
    assert_eq!(err.col(), 7);
}

#[test]
fn test_unclosed_tuple() {
    let err = parse("(1, 2").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Expected { expected: ")", context: "tuple", col: 6, .. }
    ));
}

#[test]
fn test_let_rec_requires_a_parameter() {
    let err = parse("let rec f = 1 in f").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { context: "let rec", col: 11, .. }));
    assert_eq!(err.token(), "=");
}

#[test]
fn test_trailing_tokens() {
    let err = parse("1 2 )").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { context: "expression", col: 5, .. }));
}

#[test]
fn test_keyword_is_not_an_identifier() {
    let err = parse("let in = 1 in 2").unwrap_err();
    assert_eq!(err.token(), "in");
    assert_eq!(err.col(), 5);
}

#[test]
fn test_unexpected_character_on_second_line() {
    let err = parse("let x = 1 in\n  x + $").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedChar {
            line: 2,
            col: 7,
            ch: '$'
        }
    );
}

#[test]
fn test_greater_than_is_not_a_symbol() {
    let err = parse("a > b").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedChar { ch: '>', col: 3, .. }));
}

#[test]
fn test_integer_out_of_range() {
    let err = parse("1 + 99999999999").unwrap_err();
    assert!(matches!(err, ParseError::IntegerOutOfRange { col: 5, .. }));
    assert_eq!(err.token(), "99999999999");
}
