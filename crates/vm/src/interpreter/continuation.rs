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

use super::value::{Env, Value};

/// What to do with the value of the subexpression being evaluated. The
/// interpreter keeps these on an explicit stack instead of the native one.
pub enum Continuation<'a> {
    /// Bind the value and evaluate the `let` body
    LetBody {
        name: &'a str,
        body: &'a Expr,
        env: Env<'a>,
    },
    /// The callee is known; evaluate the argument next
    AppArg { arg: &'a Expr, env: Env<'a> },
    /// The argument is known; apply the callee to it
    AppCall { callee: Value<'a> },
    IfBranch {
        then_branch: &'a Expr,
        else_branch: &'a Expr,
        env: Env<'a>,
    },
    PrimRight {
        op: BinOp,
        right: &'a Expr,
        env: Env<'a>,
    },
    PrimApply { op: BinOp, left: Value<'a> },
    /// Elements still to evaluate, and the values gathered so far
    TupleRest {
        rest: &'a [Expr],
        done: Vec<Value<'a>>,
        env: Env<'a>,
    },
}
