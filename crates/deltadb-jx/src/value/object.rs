// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Insertion-ordered object storage.

use super::{Jx, ObjectItem};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// An object's items, in insertion order.
///
/// Before evaluation an object literal's items may carry unevaluated key and
/// value expressions and an attached comprehension, exactly like an array
/// literal's items; this is the same representation used for
/// fully-evaluated objects, where every item is a plain `(string key,
/// value)` pair with no comprehension. The `get`/`insert`/`remove`/`iter`
/// family only ever see plain entries, which is what every caller outside
/// the parser and evaluator deals with.
///
/// Objects in this language are small (catalog records rarely carry more
/// than a few dozen fields), so a linear scan beats a hash map on both
/// memory and lookup cost at this scale, and it preserves insertion order
/// for free, which the printer and `items()`/`keys()`/`values()` depend on.
#[derive(Clone, Debug, Default)]
pub struct JxObject(Vec<ObjectItem>);

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl JxObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object directly from raw items, preserving any attached
    /// comprehensions. Used by the parser to build unevaluated literals.
    #[must_use]
    pub fn from_items(items: Vec<ObjectItem>) -> Self {
        Self(items)
    }

    /// Returns the raw items, including any attached comprehensions. Used
    /// by the evaluator to expand object literals.
    #[must_use]
    pub fn items(&self) -> &[ObjectItem] {
        &self.0
    }

    /// Returns the number of plain entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns whether the object has no plain entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Looks up a value by key among the object's plain entries.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Jx> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Inserts or replaces a key's value, preserving the original insertion
    /// position on replacement and appending on a new key.
    pub fn insert(&mut self, key: String, value: Jx) {
        let existing = self.0.iter_mut().find(|item| {
            item.comprehension.is_none() && item.key.as_str() == Some(key.as_str())
        });
        if let Some(item) = existing {
            item.value = Box::new(value);
        } else {
            self.0.push(ObjectItem::pair(Jx::String(key), value));
        }
    }

    /// Removes a key, returning its value if a plain entry for it exists.
    pub fn remove(&mut self, key: &str) -> Option<Jx> {
        let index = self.0.iter().position(|item| {
            item.comprehension.is_none() && item.key.as_str() == Some(key)
        })?;
        Some(*self.0.remove(index).value)
    }

    /// Iterates over plain entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Jx)> {
        self.0.iter().filter_map(|item| {
            if item.comprehension.is_some() {
                return None;
            }
            item.key.as_str().map(|key| (key, item.value.as_ref()))
        })
    }

    /// Returns the keys of plain entries in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    /// Returns the values of plain entries in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Jx> {
        self.iter().map(|(_, v)| v)
    }

    /// Merges this object with another, with entries from `other` winning
    /// on key conflicts and appending after this object's own entries
    /// otherwise.
    #[must_use]
    pub fn merged_with(&self, other: &JxObject) -> JxObject {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.insert(key.to_string(), value.clone());
        }
        merged
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl PartialEq for JxObject {
    /// Objects are equal when they carry the same keys mapping to equal
    /// values, independent of insertion order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(String, Jx)> for JxObject {
    fn from_iter<I: IntoIterator<Item = (String, Jx)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl<'a> IntoIterator for &'a JxObject {
    type Item = (&'a str, &'a Jx);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Jx)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
