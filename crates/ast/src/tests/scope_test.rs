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

use crate::Scope;

#[test]
fn test_extend_does_not_touch_parent() {
    let base: Scope<i32> = Scope::new().extend("x", 1);
    let left = base.extend("y", 2);
    let right = base.extend("y", 3);

    assert_eq!(base.lookup("y"), None);
    assert_eq!(left.lookup("y"), Some(&2));
    assert_eq!(right.lookup("y"), Some(&3));
    assert_eq!(left.lookup("x"), Some(&1));
    assert_eq!(right.lookup("x"), Some(&1));
}

#[test]
fn test_inner_binding_shadows_outer() {
    let scope: Scope<&str> = Scope::new().extend("x", "outer").extend("x", "inner");
    assert_eq!(scope.lookup("x"), Some(&"inner"));
    assert_eq!(scope.bindings().count(), 2);
    assert_eq!(scope.visible().count(), 1);
}

#[test]
fn test_map_rewrites_visible_bindings_in_order() {
    let scope: Scope<i32> = [("a", 1), ("b", 2), ("a", 10)].into_iter().collect();
    let doubled = scope.map(|v| v * 2);

    assert_eq!(doubled.lookup("a"), Some(&20));
    assert_eq!(doubled.lookup("b"), Some(&4));
    let names: Vec<&str> = doubled.bindings().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["a", "b"]);
    // the original is untouched
    assert_eq!(scope.lookup("a"), Some(&10));
}

#[test]
fn test_empty_scope() {
    let scope: Scope<()> = Scope::default();
    assert!(scope.is_empty());
    assert!(!scope.contains("anything"));
}
