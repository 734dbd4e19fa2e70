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

use crate::builtin::globals::*;
use crate::error::RuntimeError;
use crate::host::{HostEvent, RecordingHost};
use crate::interpreter::Value;

#[test]
fn test_globals_bind_every_builtin() {
    let env = register_globals();
    for name in ast::BUILTINS {
        match env.lookup(name) {
            Some(Value::Builtin(native)) => assert_eq!(native.name, name),
            other => panic!("expected builtin {name}, got {other:?}"),
        }
    }
    assert_eq!(env.visible().count(), ast::BUILTINS.len());
}

#[test]
fn test_print_int_logic() {
    let mut host = RecordingHost::new();
    let native = print_int();
    let result = (native.func)(&Value::Int(7), &mut host).unwrap();
    assert!(matches!(result, Value::Unit));
    assert_eq!(host.events(), &[HostEvent::PrintInt(7)]);

    match (native.func)(&Value::Bool(true), &mut host) {
        Ok(_) => panic!("Expected an argument error"),
        Err(e) => assert_eq!(
            e,
            RuntimeError::BuiltinArgument {
                builtin: "print_int",
                expected: "an int",
                found: "true".to_string(),
            }
        ),
    }
    // A rejected call never reaches the host.
    assert_eq!(host.events().len(), 1);
}

#[test]
fn test_print_bool_and_unit_logic() {
    let mut host = RecordingHost::new();
    (print_bool().func)(&Value::Bool(false), &mut host).unwrap();
    (print_unit().func)(&Value::Unit, &mut host).unwrap();
    assert_eq!(host.events(), &[HostEvent::PrintBool(false), HostEvent::PrintUnit]);

    assert!(matches!(
        (print_unit().func)(&Value::Int(0), &mut host),
        Err(RuntimeError::BuiltinArgument { builtin: "print_unit", .. })
    ));
}

#[test]
fn test_now_ms_logic() {
    let mut host = RecordingHost::new();
    let native = now_ms();
    let first = (native.func)(&Value::Unit, &mut host).unwrap();
    let second = (native.func)(&Value::Unit, &mut host).unwrap();
    assert_eq!(first.as_i32(), Some(RecordingHost::START_MS));
    assert_eq!(second.as_i32(), Some(RecordingHost::START_MS + 1));
    assert!(matches!(
        (native.func)(&Value::Int(1), &mut host),
        Err(RuntimeError::BuiltinArgument { builtin: "now_ms", .. })
    ));
}
