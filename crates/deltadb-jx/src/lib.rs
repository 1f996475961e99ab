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

//! Self-describing value model and expression language.
//!
//! `deltadb-jx` is the value representation shared by every layer of
//! deltadb: catalog records, log entries, query filters and projections are
//! all values of the same [`Jx`][value::Jx] type. The crate is organized
//! around the life of a value:
//!
//! - [`value`] defines the type itself and its structural operations.
//! - [`parse`] turns source text into a `Jx` expression tree.
//! - [`print`] turns a `Jx` value back into text.
//! - [`eval`] reduces an expression tree to a value against a context.
//! - [`function`] is the library of builtin calls available to `eval`.

pub mod eval;
pub mod function;
pub mod parse;
pub mod print;
pub mod value;

pub use value::{Jx, JxObject, Op, Operator};
