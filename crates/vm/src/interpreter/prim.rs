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

use ast::BinOp;

use super::value::Value;
use crate::error::RuntimeError;

/// Applies a primitive. Arithmetic wraps at 32 bits like the compiled code.
pub fn eval_prim<'a>(op: BinOp, left: &Value<'a>, right: &Value<'a>) -> Result<Value<'a>, RuntimeError> {
    if op == BinOp::Eq {
        return structural_eq(left, right).map(Value::Bool);
    }
    let (Value::Int(l), Value::Int(r)) = (left, right) else {
        return Err(RuntimeError::InvalidOperands(op));
    };
    let (l, r) = (*l, *r);
    Ok(match op {
        BinOp::Add => Value::Int(l.wrapping_add(r)),
        BinOp::Sub => Value::Int(l.wrapping_sub(r)),
        BinOp::Mul => Value::Int(l.wrapping_mul(r)),
        BinOp::Lt => Value::Bool(l < r),
        BinOp::Le => Value::Bool(l <= r),
        BinOp::Eq => Value::Bool(l == r),
    })
}

/// `=` compares scalars by value and tuples element by element, stopping at
/// the first unequal pair. Mixed tags and functions are rejected.
fn structural_eq(left: &Value<'_>, right: &Value<'_>) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(l == r),
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::Unit, Value::Unit) => Ok(true),
        (Value::Tuple(l), Value::Tuple(r)) => {
            if l.len() != r.len() {
                return Err(RuntimeError::TupleArity {
                    left: l.len(),
                    right: r.len(),
                });
            }
            for (l, r) in l.iter().zip(r.iter()) {
                if !structural_eq(l, r)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(RuntimeError::InvalidOperands(BinOp::Eq)),
    }
}
