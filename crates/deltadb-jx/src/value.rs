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

//! The `Jx` value model.
//!
//! A `Jx` value is a tagged union that represents both runtime data (the
//! JSON-like constants that flow through the catalog) and, before
//! evaluation, an expression tree (operators, symbols, comprehensions). The
//! original design keeps a single type for both, since a record field and a
//! query expression are indistinguishable until an `eval` pass resolves the
//! latter against a context.

mod comprehension;
mod object;
mod operator;

use std::fmt;

pub use comprehension::{ArrayItem, Comprehension, ObjectItem};
pub use object::JxObject;
pub use operator::{Op, Operator};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// A self-describing value, or, before evaluation, an expression tree node.
#[derive(Clone, Debug)]
pub enum Jx {
    /// The absence of a value.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating-point number.
    Double(f64),
    /// A UTF-8 string.
    String(String),
    /// An unresolved identifier, carrying the source line it was parsed on.
    Symbol(String, u32),
    /// An ordered sequence of elements, some of which may carry a
    /// comprehension that expands them at evaluation time.
    Array(Vec<ArrayItem>),
    /// An insertion-ordered mapping of string keys to values.
    Object(JxObject),
    /// An expression tree node.
    Operator(Operator),
    /// A value describing a failure. Wraps the `Jx` that describes it,
    /// typically a [`Jx::String`].
    Error(Box<Jx>),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Jx {
    /// Creates an array from an iterator of plain values, with no attached
    /// comprehensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use deltadb_jx::Jx;
    ///
    /// let array = Jx::array([Jx::Integer(1), Jx::Integer(2)]);
    /// assert_eq!(array.len(), Some(2));
    /// ```
    #[must_use]
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Jx>,
    {
        Self::Array(items.into_iter().map(ArrayItem::value).collect())
    }

    /// Creates an object from an iterator of key/value pairs, with no
    /// attached comprehensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use deltadb_jx::Jx;
    ///
    /// let object = Jx::object([("a".to_string(), Jx::Integer(1))]);
    /// assert!(object.lookup("a").is_some());
    /// ```
    #[must_use]
    pub fn object<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Jx)>,
    {
        Self::Object(pairs.into_iter().collect())
    }

    /// Creates an error value wrapping the given message.
    #[must_use]
    pub fn error<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self::Error(Box::new(Self::String(message.into())))
    }

    /// Returns whether the value is [`Jx::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns whether the value is an [`Jx::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns whether the value is numeric, i.e. an integer or a double.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Double(_))
    }

    /// Returns the value as a double, promoting integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is a [`Jx::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as an array slice, if it is a [`Jx::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[ArrayItem]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value as an object, if it is a [`Jx::Object`].
    #[must_use]
    pub fn as_object(&self) -> Option<&JxObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the number of elements in an array or the number of entries
    /// in an object, or `None` for any other variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use deltadb_jx::Jx;
    ///
    /// assert_eq!(Jx::array([Jx::Null, Jx::Null]).len(), Some(2));
    /// assert_eq!(Jx::Integer(1).len(), None);
    /// ```
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            Self::Object(object) => Some(object.len()),
            _ => None,
        }
    }

    /// Returns whether an array or object is empty, or `None` for any other
    /// variant.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }

    /// Looks up a field by key on an object. Returns `None` if the value is
    /// not an object, or the key is absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Jx> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// Appends a value to an array, consuming it. No-op on any other
    /// variant.
    pub fn push(&mut self, value: Jx) {
        if let Self::Array(items) = self {
            items.push(ArrayItem::value(value));
        }
    }

    /// Merges two objects into a new one, with the right-hand side winning
    /// on key conflicts. Returns `None` unless both operands are objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use deltadb_jx::Jx;
    ///
    /// let a = Jx::object([("x".to_string(), Jx::Integer(1))]);
    /// let b = Jx::object([("x".to_string(), Jx::Integer(2))]);
    /// let merged = a.merge(&b).unwrap();
    /// assert_eq!(merged.lookup("x"), Some(&Jx::Integer(2)));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Jx) -> Option<Jx> {
        let lhs = self.as_object()?;
        let rhs = other.as_object()?;
        Some(Jx::Object(lhs.merged_with(rhs)))
    }

    /// Returns the human-readable name of this value's type, as used in
    /// `schema()` results and error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Symbol(..) => "symbol",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Operator(_) => "operator",
            Self::Error(_) => "error",
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl PartialEq for Jx {
    /// Structural equality: arrays compare element-by-element in order,
    /// objects compare by key/value pairs regardless of insertion order.
    /// Source lines attached to symbols and operators are not part of
    /// identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Integer(a), Self::Double(b)) | (Self::Double(b), Self::Integer(a)) => {
                *a as f64 == *b
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a, _), Self::Symbol(b, _)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Operator(a), Self::Operator(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Jx {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Jx {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Jx {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for Jx {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Jx {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for Jx {
    /// Formats the value using the compact printer.
    ///
    /// For more information, see [`crate::print`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::print::to_string(self))
    }
}
