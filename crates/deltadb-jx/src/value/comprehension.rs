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

//! Array and object literal items, and attached comprehensions.

use super::Jx;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A `for var in source (if condition)?` clause attached to a literal item,
/// optionally chained into further nested clauses.
#[derive(Clone, Debug, PartialEq)]
pub struct Comprehension {
    /// The bound loop variable's name.
    pub var: String,
    /// The expression iterated over.
    pub source: Box<Jx>,
    /// An optional filter expression, evaluated with `var` bound.
    pub condition: Option<Box<Jx>>,
    /// A further nested comprehension, for `for a in x for b in y`.
    pub next: Option<Box<Comprehension>>,
}

/// One item of an array literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayItem {
    /// The item's value expression.
    pub value: Box<Jx>,
    /// An optional attached comprehension that expands this single item
    /// into zero or more evaluated elements.
    pub comprehension: Option<Box<Comprehension>>,
}

impl ArrayItem {
    /// Creates a plain item with no attached comprehension.
    #[must_use]
    pub fn value(value: Jx) -> Self {
        Self { value: Box::new(value), comprehension: None }
    }

    /// Creates an item with an attached comprehension.
    #[must_use]
    pub fn with_comprehension(value: Jx, comprehension: Comprehension) -> Self {
        Self { value: Box::new(value), comprehension: Some(Box::new(comprehension)) }
    }
}

/// One item of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectItem {
    /// The key expression; evaluates to a [`Jx::String`].
    pub key: Box<Jx>,
    /// The value expression.
    pub value: Box<Jx>,
    /// An optional attached comprehension, as in [`ArrayItem`].
    pub comprehension: Option<Box<Comprehension>>,
}

impl ObjectItem {
    /// Creates a plain key/value item with no attached comprehension.
    #[must_use]
    pub fn pair(key: Jx, value: Jx) -> Self {
        Self { key: Box::new(key), value: Box::new(value), comprehension: None }
    }

    /// Creates an item with an attached comprehension.
    #[must_use]
    pub fn with_comprehension(key: Jx, value: Jx, comprehension: Comprehension) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            comprehension: Some(Box::new(comprehension)),
        }
    }
}
