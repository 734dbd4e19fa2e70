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

use ast::BUILTINS;

use crate::error::RuntimeError;
use crate::host::Host;
use crate::interpreter::{Env, NativeFn, Value};

/// The initial environment: one native per entry of `ast::BUILTINS`, in the
/// same order.
pub fn register_globals() -> Env<'static> {
    let natives = [print_int(), print_bool(), print_unit(), now_ms()];
    debug_assert!(natives.iter().map(|n| n.name).eq(BUILTINS));
    natives
        .into_iter()
        .map(|native| (native.name, Value::Builtin(native)))
        .collect()
}

fn argument_error(builtin: &'static str, expected: &'static str, found: &Value<'_>) -> RuntimeError {
    RuntimeError::BuiltinArgument {
        builtin,
        expected,
        found: found.to_string(),
    }
}

pub fn print_int() -> NativeFn {
    NativeFn {
        name: "print_int",
        func: |arg, host| match arg {
            Value::Int(n) => {
                host.print_int(*n);
                Ok(Value::Unit)
            }
            other => Err(argument_error("print_int", "an int", other)),
        },
    }
}

pub fn print_bool() -> NativeFn {
    NativeFn {
        name: "print_bool",
        func: |arg, host| match arg {
            Value::Bool(b) => {
                host.print_bool(*b);
                Ok(Value::Unit)
            }
            other => Err(argument_error("print_bool", "a bool", other)),
        },
    }
}

pub fn print_unit() -> NativeFn {
    NativeFn {
        name: "print_unit",
        func: |arg, host| match arg {
            Value::Unit => {
                host.print_unit();
                Ok(Value::Unit)
            }
            other => Err(argument_error("print_unit", "()", other)),
        },
    }
}

pub fn now_ms() -> NativeFn {
    NativeFn {
        name: "now_ms",
        func: |arg, host| match arg {
            Value::Unit => Ok(Value::Int(host.now_ms())),
            other => Err(argument_error("now_ms", "()", other)),
        },
    }
}
