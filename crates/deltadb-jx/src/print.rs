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

//! Serializing `Jx` values back to text.

use std::fmt::{self, Write};

use crate::value::{ArrayItem, Jx, Op, ObjectItem, Operator};

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Serializes a value to a compact single-line string.
///
/// # Examples
///
/// ```
/// use deltadb_jx::Jx;
/// use deltadb_jx::print::to_string;
///
/// let value = Jx::object([("a".to_string(), Jx::Integer(1))]);
/// assert_eq!(to_string(&value), "{\"a\":1}");
/// ```
#[must_use]
pub fn to_string(value: &Jx) -> String {
    let mut out = String::new();
    // A `String` implements `fmt::Write` infallibly, so this never fails.
    write(&mut out, value, None).expect("writing to a String is infallible");
    out
}

/// Serializes a value to a pretty-printed string, with objects indented two
/// spaces per nesting level. Arrays and atomic values stay on one line.
///
/// # Examples
///
/// ```
/// use deltadb_jx::Jx;
/// use deltadb_jx::print::to_string_pretty;
///
/// let value = Jx::object([("a".to_string(), Jx::Integer(1))]);
/// assert_eq!(to_string_pretty(&value), "{\n  \"a\": 1\n}");
/// ```
#[must_use]
pub fn to_string_pretty(value: &Jx) -> String {
    let mut out = String::new();
    write_pretty(&mut out, value, 0).expect("writing to a String is infallible");
    out
}

/// Serializes a value to any [`fmt::Write`] sink.
pub fn write<W: fmt::Write>(out: &mut W, value: &Jx, parent: Option<Op>) -> fmt::Result {
    match value {
        Jx::Null => out.write_str("null"),
        Jx::Boolean(true) => out.write_str("true"),
        Jx::Boolean(false) => out.write_str("false"),
        Jx::Integer(v) => write!(out, "{v}"),
        Jx::Double(v) => write_double(out, *v),
        Jx::String(v) => write_quoted(out, v),
        Jx::Symbol(name, _) => out.write_str(name),
        Jx::Array(items) => write_array(out, items),
        Jx::Object(object) => write_object(out, object.items()),
        Jx::Operator(op) => write_operator(out, op, parent),
        Jx::Error(inner) => {
            out.write_str("error(")?;
            write(out, inner, None)?;
            out.write_char(')')
        }
    }
}

fn write_double<W: fmt::Write>(out: &mut W, value: f64) -> fmt::Result {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str(if value > 0.0 { "inf" } else { "-inf" });
    }
    // `%g`-style: shortest round-tripping form, always with a fractional
    // part or exponent so the type stays distinguishable from an integer.
    let rendered = format!("{value}");
    if rendered.contains(['.', 'e', 'E']) {
        out.write_str(&rendered)
    } else {
        write!(out, "{rendered}.0")
    }
}

fn write_quoted<W: fmt::Write>(out: &mut W, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\u{8}' => out.write_str("\\b")?,
            '\u{c}' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_array<W: fmt::Write>(out: &mut W, items: &[ArrayItem]) -> fmt::Result {
    out.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write(out, &item.value, None)?;
        write_comprehension(out, item.comprehension.as_deref())?;
    }
    out.write_char(']')
}

fn write_object<W: fmt::Write>(out: &mut W, items: &[ObjectItem]) -> fmt::Result {
    out.write_char('{')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write(out, &item.key, None)?;
        out.write_char(':')?;
        write(out, &item.value, None)?;
        write_comprehension(out, item.comprehension.as_deref())?;
    }
    out.write_char('}')
}

fn write_comprehension<W: fmt::Write>(
    out: &mut W,
    comprehension: Option<&crate::value::Comprehension>,
) -> fmt::Result {
    let Some(c) = comprehension else {
        return Ok(());
    };
    write!(out, " for {} in ", c.var)?;
    write(out, &c.source, None)?;
    if let Some(condition) = &c.condition {
        out.write_str(" if ")?;
        write(out, condition, None)?;
    }
    write_comprehension(out, c.next.as_deref())
}

fn write_operator<W: fmt::Write>(out: &mut W, op: &Operator, parent: Option<Op>) -> fmt::Result {
    let needs_parens = parent.is_some_and(|p| p.precedence() < op.op.precedence());
    if needs_parens {
        out.write_char('(')?;
    }
    match op.op {
        Op::Lookup => {
            write(out, op.left.as_deref().unwrap_or(&Jx::Null), Some(op.op))?;
            out.write_char('[')?;
            write(out, &op.right, None)?;
            out.write_char(']')?;
        }
        Op::Call => {
            write(out, op.left.as_deref().unwrap_or(&Jx::Null), Some(op.op))?;
            out.write_char('(')?;
            if let Jx::Array(args) = op.right.as_ref() {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write(out, &arg.value, None)?;
                }
            }
            out.write_char(')')?;
        }
        Op::Dot => {
            write(out, op.left.as_deref().unwrap_or(&Jx::Null), Some(op.op))?;
            out.write_char('.')?;
            write(out, &op.right, None)?;
        }
        Op::Neg | Op::Not => {
            out.write_str(op.op.as_str())?;
            write(out, &op.right, Some(op.op))?;
        }
        Op::Colon => {
            if let Some(left) = &op.left {
                write(out, left, None)?;
            }
            out.write_char(':')?;
            if !matches!(op.right.as_ref(), Jx::Null) {
                write(out, &op.right, None)?;
            }
        }
        _ => {
            write(
                out,
                op.left.as_deref().unwrap_or(&Jx::Null),
                Some(op.op),
            )?;
            write!(out, " {} ", op.op.as_str())?;
            write(out, &op.right, Some(op.op))?;
        }
    }
    if needs_parens {
        out.write_char(')')?;
    }
    Ok(())
}

fn write_pretty<W: fmt::Write>(out: &mut W, value: &Jx, depth: usize) -> fmt::Result {
    match value {
        Jx::Object(object) if !object.is_empty() => {
            out.write_str("{\n")?;
            let indent = "  ".repeat(depth + 1);
            let items = object.items();
            for (i, item) in items.iter().enumerate() {
                out.write_str(&indent)?;
                write(out, &item.key, None)?;
                out.write_str(": ")?;
                write_pretty(out, &item.value, depth + 1)?;
                if i + 1 < items.len() {
                    out.write_char(',')?;
                }
                out.write_char('\n')?;
            }
            write!(out, "{}}}", "  ".repeat(depth))
        }
        other => write(out, other, None),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Operator;

    #[test]
    fn prints_atoms() {
        assert_eq!(to_string(&Jx::Null), "null");
        assert_eq!(to_string(&Jx::Boolean(true)), "true");
        assert_eq!(to_string(&Jx::Integer(42)), "42");
        assert_eq!(to_string(&Jx::String("hi\n".into())), "\"hi\\n\"");
    }

    #[test]
    fn prints_array_and_object() {
        let value = Jx::array([Jx::Integer(1), Jx::Integer(2)]);
        assert_eq!(to_string(&value), "[1,2]");

        let value = Jx::object([("a".to_string(), Jx::Integer(1))]);
        assert_eq!(to_string(&value), "{\"a\":1}");
    }

    #[test]
    fn parenthesizes_by_precedence() {
        // (1 + 2) * 3 needs parens around the addition.
        let add = Jx::Operator(Operator::binary(Op::Add, Jx::Integer(1), Jx::Integer(2), 1));
        let mul = Jx::Operator(Operator::binary(Op::Mul, add, Jx::Integer(3), 1));
        assert_eq!(to_string(&mul), "(1 + 2) * 3");
    }

    #[test]
    fn does_not_parenthesize_same_precedence_left_operand() {
        // 1 - 2 - 3 parses left-associatively and should round-trip bare.
        let inner = Jx::Operator(Operator::binary(Op::Sub, Jx::Integer(1), Jx::Integer(2), 1));
        let outer = Jx::Operator(Operator::binary(Op::Sub, inner, Jx::Integer(3), 1));
        assert_eq!(to_string(&outer), "1 - 2 - 3");
    }
}
