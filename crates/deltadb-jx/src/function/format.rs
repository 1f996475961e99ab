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

//! Python-printf style string formatting for the `format()` builtin.

use std::fmt::Write as _;

use crate::value::Jx;

/// Expands a `%`-style format string against positional arguments.
///
/// Supports `%d %i %e %E %f %F %g %G %s %%`. A `%` with no recognized
/// conversion, or more conversions than arguments, is an error.
pub fn format(fmt: &str, args: &[Jx]) -> Result<String, String> {
    let mut out = String::new();
    let mut args = args.iter();
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(conv @ ('d' | 'i')) => {
                let value = next_number(&mut args, conv)?;
                write!(out, "{}", value as i64).unwrap();
            }
            Some(conv @ ('f' | 'F')) => {
                let value = next_number(&mut args, conv)?;
                write!(out, "{value:.6}").unwrap();
            }
            Some(conv @ ('e' | 'E')) => {
                let value = next_number(&mut args, conv)?;
                let rendered = format!("{value:e}");
                out.push_str(&if conv == 'E' { rendered.to_uppercase() } else { rendered });
            }
            Some(conv @ ('g' | 'G')) => {
                let value = next_number(&mut args, conv)?;
                let rendered = format!("{value}");
                out.push_str(&if conv == 'G' { rendered.to_uppercase() } else { rendered });
            }
            Some('s') => {
                let value = args.next().ok_or("format: not enough arguments")?;
                match value {
                    Jx::String(s) => out.push_str(s),
                    other => out.push_str(&crate::print::to_string(other)),
                }
            }
            Some(other) => return Err(format!("format: unsupported conversion %{other}")),
            None => return Err("format: trailing %".to_string()),
        }
    }
    Ok(out)
}

fn next_number<'a, I: Iterator<Item = &'a Jx>>(args: &mut I, conv: char) -> Result<f64, String> {
    args.next()
        .ok_or_else(|| "format: not enough arguments".to_string())?
        .as_f64()
        .ok_or_else(|| format!("format: %{conv} requires a numeric argument"))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_integers_and_strings() {
        let out = format("%s has %d items", &[Jx::String("cart".into()), Jx::Integer(3)]).unwrap();
        assert_eq!(out, "cart has 3 items");
    }

    #[test]
    fn formats_percent_literal() {
        assert_eq!(format("100%%", &[]).unwrap(), "100%");
    }

    #[test]
    fn errors_on_missing_argument() {
        assert!(format("%d", &[]).is_err());
    }
}
