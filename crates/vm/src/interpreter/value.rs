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

use std::fmt;
use std::rc::Rc;

use ast::{Expr, Ident, Scope};

use crate::error::RuntimeError;
use crate::host::Host;

/// Runtime environment: a persistent scope shared by every closure that
/// captures it.
pub type Env<'a> = Scope<Value<'a>>;

/// A native builtin. Builtins only ever return scalars, hence `'static`.
pub type NativeFunc = fn(&Value<'_>, &mut dyn Host) -> Result<Value<'static>, RuntimeError>;

#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    pub func: NativeFunc,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// A function value. `rec_name` is set for `let rec` functions, which see
/// themselves under that name every time they are entered.
#[derive(Debug)]
pub struct Closure<'a> {
    pub param: &'a str,
    pub body: &'a Expr,
    pub env: Env<'a>,
    pub rec_name: Option<&'a str>,
}

impl<'a> Closure<'a> {
    /// The environment a call evaluates the body in. The parameter is bound
    /// last so it shadows the recursive name.
    pub fn enter(closure: &Rc<Closure<'a>>, arg: Value<'a>) -> Env<'a> {
        let env = match closure.rec_name {
            Some(name) => closure
                .env
                .extend(name, Value::Closure(Rc::clone(closure))),
            None => closure.env.clone(),
        };
        env.extend(closure.param, arg)
    }
}

#[derive(Debug, Clone)]
pub enum Value<'a> {
    Int(i32),
    Bool(bool),
    Unit,
    Closure(Rc<Closure<'a>>),
    Tuple(Rc<[Value<'a>]>),
    Builtin(NativeFn),
}

impl<'a> Value<'a> {
    pub fn closure(param: &'a Ident, body: &'a Expr, env: Env<'a>, rec_name: Option<&'a Ident>) -> Self {
        Value::Closure(Rc::new(Closure {
            param,
            body,
            env,
            rec_name: rec_name.map(String::as_str),
        }))
    }

    /// Name of the runtime tag, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
            Value::Closure(_) | Value::Builtin(_) => "function",
            Value::Tuple(_) => "tuple",
        }
    }

    /// The scalar a compiled program would return for this value: integers
    /// as-is, booleans as 0/1, unit as 0. Heap values have no comparable form.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i32::from(*b)),
            Value::Unit => Some(0),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Unit => write!(f, "()"),
            Value::Closure(_) => write!(f, "<fun>"),
            Value::Builtin(native) => write!(f, "<builtin {}>", native.name),
            Value::Tuple(elts) => {
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
