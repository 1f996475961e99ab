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

//! `{name}` template expansion for the `template()` builtin.

use crate::value::Jx;

/// Expands `{name}` placeholders in `tmpl` by looking them up first in the
/// optional `overrides` object argument, falling back to... nothing: unlike
/// `eval`'s symbol resolution, `template()` has no ambient context, so an
/// unresolved placeholder is left untouched rather than erroring, matching
/// its use as a display-string helper rather than a query predicate.
pub fn expand(args: &[Jx]) -> Jx {
    let Some(Jx::String(tmpl)) = args.first() else {
        return Jx::error("template: wrong number or type of arguments");
    };
    let overrides = match args.get(1) {
        Some(Jx::Object(object)) => Some(object),
        None => None,
        Some(_) => return Jx::error("template: second argument must be an object"),
    };

    let mut out = String::with_capacity(tmpl.len());
    let mut chars = tmpl.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let Some(end) = tmpl[i + 1..].find('}') else {
            out.push('{');
            continue;
        };
        let name = &tmpl[i + 1..i + 1 + end];
        for _ in 0..=end {
            chars.next();
        }

        match overrides.and_then(|o| o.get(name)) {
            Some(Jx::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&crate::print::to_string(other)),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
    }
    Jx::String(out)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_placeholder() {
        let tmpl = Jx::String("hello {name}".into());
        let overrides = Jx::object([("name".to_string(), Jx::String("world".into()))]);
        assert_eq!(expand(&[tmpl, overrides]), Jx::String("hello world".into()));
    }

    #[test]
    fn leaves_unknown_placeholder_untouched() {
        let tmpl = Jx::String("hello {name}".into());
        assert_eq!(expand(&[tmpl]), Jx::String("hello {name}".into()));
    }
}
