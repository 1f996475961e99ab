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

//! The builtin function library available to `eval`.
//!
//! Most functions are pure: they receive already-evaluated arguments and
//! return a value. `select`, `where` and `project` are deferred: the
//! evaluator passes them their list argument evaluated but their predicate
//! or body argument as a raw, unevaluated expression, which they evaluate
//! themselves once per list element with an extended context. `listdir` and
//! `fetch` are external: they touch the filesystem or network and are only
//! reachable when the caller has opted in via
//! [`crate::eval::EvalOptions::external_functions`].

use std::fs;
use std::io::Read as _;

use regex::Regex;

use crate::value::{Jx, JxObject};

mod format;
mod template;

pub use format::format as format_string;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Whether a function's arguments are evaluated before the call, or left as
/// raw expressions for the function itself to evaluate (`select`, `where`,
/// `project`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// All arguments are evaluated before dispatch.
    Eager,
    /// The list argument is evaluated; the second argument is left raw.
    Deferred,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether `name` names a known function.
#[must_use]
pub fn is_known(name: &str) -> bool {
    matches!(
        name,
        "range"
            | "format"
            | "join"
            | "ceil"
            | "floor"
            | "basename"
            | "dirname"
            | "listdir"
            | "escape"
            | "template"
            | "len"
            | "fetch"
            | "select"
            | "where"
            | "project"
            | "schema"
            | "like"
            | "keys"
            | "values"
            | "items"
    )
}

/// Returns whether `name` is a deferred function (`select`, `where`,
/// `project`), whose second argument is passed unevaluated.
#[must_use]
pub fn is_deferred(name: &str) -> bool {
    matches!(name, "select" | "where" | "project")
}

/// Returns whether `name` is an external function (`listdir`, `fetch`),
/// gated by [`crate::eval::EvalOptions::external_functions`].
#[must_use]
pub fn is_external(name: &str) -> bool {
    matches!(name, "listdir" | "fetch")
}

/// Calls an eager (non-deferred) function by name with already-evaluated
/// arguments.
///
/// Returns `None` if `name` does not name an eager function known to this
/// module (including the deferred `select`/`where`/`project`, which the
/// evaluator must dispatch separately).
#[must_use]
pub fn call(name: &str, args: &[Jx], external_functions: bool) -> Option<Jx> {
    match name {
        "range" => Some(range(args)),
        "format" => Some(format_call(args)),
        "join" => Some(join(args)),
        "ceil" => Some(unary_numeric(args, f64::ceil)),
        "floor" => Some(unary_numeric(args, f64::floor)),
        "basename" => Some(basename(args)),
        "dirname" => Some(dirname(args)),
        "listdir" => Some(listdir(args, external_functions)),
        "escape" => Some(escape(args)),
        "template" => Some(template::expand(args)),
        "len" => Some(len(args)),
        "fetch" => Some(fetch(args, external_functions)),
        "schema" => Some(schema(args)),
        "like" => Some(like(args)),
        "keys" => Some(keys(args)),
        "values" => Some(values(args)),
        "items" => Some(items(args)),
        _ => None,
    }
}

fn arity_error(name: &str) -> Jx {
    Jx::error(format!("{name}: wrong number or type of arguments"))
}

fn range(args: &[Jx]) -> Jx {
    let ints = args.iter().map(Jx::as_f64).collect::<Option<Vec<_>>>();
    let Some(values) = ints else {
        return arity_error("range");
    };
    let (start, stop, step) = match values.as_slice() {
        [stop] => (0.0, *stop, 1.0),
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] if *step != 0.0 => (*start, *stop, *step),
        _ => return arity_error("range"),
    };
    let mut out = Vec::new();
    let mut i = start;
    if step > 0.0 {
        while i < stop {
            out.push(Jx::Integer(i as i64));
            i += step;
        }
    } else {
        while i > stop {
            out.push(Jx::Integer(i as i64));
            i += step;
        }
    }
    Jx::array(out)
}

fn format_call(args: &[Jx]) -> Jx {
    let Some((Jx::String(fmt), rest)) = args.split_first() else {
        return arity_error("format");
    };
    match format::format(fmt, rest) {
        Ok(s) => Jx::String(s),
        Err(message) => Jx::error(message),
    }
}

fn join(args: &[Jx]) -> Jx {
    let Some(Jx::Array(items)) = args.first() else {
        return arity_error("join");
    };
    let delim = match args.get(1) {
        Some(Jx::String(s)) => s.as_str(),
        None => "",
        Some(_) => return arity_error("join"),
    };
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item.value.as_ref() {
            Jx::String(s) => parts.push(s.clone()),
            other => return Jx::error(format!("join: non-string element {}", other.type_name())),
        }
    }
    Jx::String(parts.join(delim))
}

fn unary_numeric(args: &[Jx], f: fn(f64) -> f64) -> Jx {
    match args.first().and_then(Jx::as_f64) {
        Some(value) => Jx::Double(f(value)),
        None => arity_error("ceil/floor"),
    }
}

fn basename(args: &[Jx]) -> Jx {
    let Some(Jx::String(path)) = args.first() else {
        return arity_error("basename");
    };
    let suffix = match args.get(1) {
        Some(Jx::String(s)) => Some(s.as_str()),
        None => None,
        Some(_) => return arity_error("basename"),
    };
    Jx::String(deltadb_path::path::transform::basename(path, suffix).to_string())
}

fn dirname(args: &[Jx]) -> Jx {
    let Some(Jx::String(path)) = args.first() else {
        return arity_error("dirname");
    };
    Jx::String(deltadb_path::path::transform::dirname(path).to_string())
}

fn listdir(args: &[Jx], external_functions: bool) -> Jx {
    if !external_functions {
        return Jx::error("listdir: external functions are disabled");
    }
    let Some(Jx::String(path)) = args.first() else {
        return arity_error("listdir");
    };
    match fs::read_dir(path) {
        Ok(entries) => {
            let mut names = Vec::new();
            for entry in entries.flatten() {
                names.push(Jx::String(entry.file_name().to_string_lossy().into_owned()));
            }
            Jx::array(names)
        }
        Err(err) => Jx::error(format!("listdir: {err}")),
    }
}

fn escape(args: &[Jx]) -> Jx {
    let Some(Jx::String(s)) = args.first() else {
        return arity_error("escape");
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    Jx::String(out)
}

fn len(args: &[Jx]) -> Jx {
    match args.first().and_then(Jx::len) {
        Some(n) => Jx::Integer(n as i64),
        None => arity_error("len"),
    }
}

fn fetch(args: &[Jx], external_functions: bool) -> Jx {
    if !external_functions {
        return Jx::error("fetch: external functions are disabled");
    }
    let Some(Jx::String(source)) = args.first() else {
        return arity_error("fetch");
    };
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        return Jx::error("fetch: remote retrieval requires a configured HTTP client");
    } else {
        match fs::File::open(source) {
            Ok(mut file) => {
                let mut buf = String::new();
                match file.read_to_string(&mut buf) {
                    Ok(_) => buf,
                    Err(err) => return Jx::error(format!("fetch: {err}")),
                }
            }
            Err(err) => return Jx::error(format!("fetch: {err}")),
        }
    };
    let mut parser = crate::parse::Parser::new(&body);
    match parser.parse_value() {
        Some(value) => value,
        None => Jx::error("fetch: could not parse JX from source"),
    }
}

fn schema(args: &[Jx]) -> Jx {
    let Some(Jx::Array(items)) = args.first() else {
        return arity_error("schema");
    };
    let mut observed = JxObject::new();
    for item in items {
        let Jx::Object(object) = item.value.as_ref() else {
            return Jx::error("schema: non-object element");
        };
        for (key, value) in object.iter() {
            observed.insert(key.to_string(), Jx::String(value.type_name().to_string()));
        }
    }
    Jx::Object(observed)
}

fn like(args: &[Jx]) -> Jx {
    let (Some(Jx::String(value)), Some(Jx::String(pattern))) = (args.first(), args.get(1)) else {
        return arity_error("like");
    };
    match Regex::new(pattern) {
        Ok(re) => Jx::Boolean(re.is_match(value)),
        Err(err) => Jx::error(format!("like: invalid pattern: {err}")),
    }
}

fn keys(args: &[Jx]) -> Jx {
    let Some(Jx::Object(object)) = args.first() else {
        return arity_error("keys");
    };
    Jx::array(object.keys().map(|k| Jx::String(k.to_string())))
}

fn values(args: &[Jx]) -> Jx {
    let Some(Jx::Object(object)) = args.first() else {
        return arity_error("values");
    };
    Jx::array(object.values().cloned())
}

fn items(args: &[Jx]) -> Jx {
    let Some(Jx::Object(object)) = args.first() else {
        return arity_error("items");
    };
    Jx::array(
        object
            .iter()
            .map(|(k, v)| Jx::array([v.clone(), Jx::String(k.to_string())])),
    )
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_single_argument() {
        let result = range(&[Jx::Integer(3)]);
        assert_eq!(result, Jx::array([Jx::Integer(0), Jx::Integer(1), Jx::Integer(2)]));
    }

    #[test]
    fn range_with_negative_step() {
        let result = range(&[Jx::Integer(3), Jx::Integer(0), Jx::Integer(-1)]);
        assert_eq!(result, Jx::array([Jx::Integer(3), Jx::Integer(2), Jx::Integer(1)]));
    }

    #[test]
    fn join_concatenates_with_delimiter() {
        let list = Jx::array([Jx::String("a".into()), Jx::String("b".into())]);
        let result = join(&[list, Jx::String(",".into())]);
        assert_eq!(result, Jx::String("a,b".into()));
    }

    #[test]
    fn like_matches_regex() {
        let result = like(&[Jx::String("hello".into()), Jx::String("^he".into())]);
        assert_eq!(result, Jx::Boolean(true));
    }

    #[test]
    fn items_yields_value_key_pairs() {
        let object = Jx::object([("a".to_string(), Jx::Integer(1))]);
        let result = items(&[object]);
        assert_eq!(
            result,
            Jx::array([Jx::array([Jx::Integer(1), Jx::String("a".into())])])
        );
    }

    #[test]
    fn listdir_is_rejected_without_external_functions() {
        let result = listdir(&[Jx::String(".".into())], false);
        assert!(result.is_error());
    }
}
