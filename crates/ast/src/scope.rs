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

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// One binding plus a shared pointer to the scope it extends.
struct Binding<V> {
    name: String,
    value: V,
    parent: Option<Rc<Binding<V>>>,
}

/// A persistent, immutable scope of named bindings.
///
/// `extend` returns a new scope that shares every existing binding with its
/// parent, so extending is O(1) and never disturbs a scope that siblings (both
/// `if` arms, the elements of a tuple, closures created in the same body) still
/// hold. Lookups walk from the innermost binding outwards, so a later binding
/// shadows an earlier one with the same name.
pub struct Scope<V> {
    head: Option<Rc<Binding<V>>>,
}

impl<V> Scope<V> {
    pub fn new() -> Self {
        Self { head: None }
    }

    pub fn extend(&self, name: impl Into<String>, value: V) -> Self {
        Self {
            head: Some(Rc::new(Binding {
                name: name.into(),
                value,
                parent: self.head.clone(),
            })),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.bindings()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Every binding, innermost first, including shadowed ones.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &V)> {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let binding = cursor?;
            cursor = binding.parent.as_deref();
            Some((binding.name.as_str(), &binding.value))
        })
    }

    /// Visible bindings only, innermost first.
    pub fn visible(&self) -> impl Iterator<Item = (&str, &V)> {
        let mut seen = HashSet::new();
        self.bindings().filter(move |(name, _)| seen.insert(*name))
    }

    /// Rebuilds the scope with every visible binding passed through `f`.
    /// Shadowed bindings are dropped since they can no longer be observed.
    pub fn map(&self, mut f: impl FnMut(&V) -> V) -> Self {
        let mut visible: Vec<(&str, &V)> = self.visible().collect();
        visible.reverse();
        visible
            .into_iter()
            .fold(Scope::new(), |scope, (name, value)| scope.extend(name, f(value)))
    }
}

impl<V> Clone for Scope<V> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<V> Default for Scope<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Scope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.visible()).finish()
    }
}

impl<N: Into<String>, V> FromIterator<(N, V)> for Scope<V> {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Scope::new(), |scope, (name, value)| scope.extend(name, value))
    }
}
