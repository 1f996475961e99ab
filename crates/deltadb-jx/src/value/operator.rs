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

//! Expression tree operator nodes.

use super::Jx;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// An operator kind, ordered here roughly tightest-binding first; actual
/// precedence is defined by [`Op::precedence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// `left[right]`, or `left[start:stop]` when `right` is a [`Op::Colon`]
    /// node.
    Lookup,
    /// `left:right` inside a `[...]` index, where either operand may be
    /// absent (`left` is `None`; `right` is [`Jx::Null`] when the stop
    /// bound is omitted).
    Colon,
    /// `left(right)`, where `right` is an array of arguments.
    Call,
    /// `left.right`, lowered by the parser to `Call` with `left` prepended
    /// to the argument list; retained as a distinct tag for the printer.
    Dot,
    /// Unary negation, `-right`.
    Neg,
    /// Unary boolean negation, `!right` / `not right`.
    Not,
    /// `left * right`.
    Mul,
    /// `left / right`.
    Div,
    /// `left % right`.
    Mod,
    /// `left + right`. Concatenates strings and arrays.
    Add,
    /// `left - right`.
    Sub,
    /// `left == right`.
    Eq,
    /// `left != right`.
    Ne,
    /// `left < right`.
    Lt,
    /// `left <= right`.
    Le,
    /// `left > right`.
    Gt,
    /// `left >= right`.
    Ge,
    /// `left and right`, short-circuiting.
    And,
    /// `left or right`, short-circuiting.
    Or,
}

impl Op {
    /// Returns the binding precedence of the operator, where `0` binds
    /// tightest (postfix) and higher numbers bind looser.
    ///
    /// Mirrors the tightest-first chain: postfix < unary < `* / %` <
    /// `+ -` < comparisons < `and` < `or`.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Self::Lookup | Self::Call | Self::Dot | Self::Colon => 0,
            Self::Neg | Self::Not => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
            Self::Add | Self::Sub => 3,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::And => 5,
            Self::Or => 6,
        }
    }

    /// Returns whether the operator takes a single operand (stored in
    /// [`Operator::right`], with [`Operator::left`] absent).
    #[must_use]
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Neg | Self::Not)
    }

    /// Returns the source spelling of the operator, as printed between its
    /// operands.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookup | Self::Call | Self::Dot => "",
            Self::Colon => ":",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// An expression tree node: an operator together with its operand(s) and
/// the source line it was parsed on.
#[derive(Clone, Debug, PartialEq)]
pub struct Operator {
    /// The operator kind.
    pub op: Op,
    /// The left operand, absent for unary operators.
    pub left: Option<Box<Jx>>,
    /// The right operand (the sole operand, for unary operators).
    pub right: Box<Jx>,
    /// Source line this node was parsed on, 1-based.
    pub line: u32,
}

impl Operator {
    /// Creates a binary operator node.
    #[must_use]
    pub fn binary(op: Op, left: Jx, right: Jx, line: u32) -> Self {
        Self { op, left: Some(Box::new(left)), right: Box::new(right), line }
    }

    /// Creates a unary operator node.
    #[must_use]
    pub fn unary(op: Op, right: Jx, line: u32) -> Self {
        Self { op, left: None, right: Box::new(right), line }
    }
}
