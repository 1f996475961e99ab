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

//! Reducing an expression tree to a value against a context.
//!
//! `eval` never panics and never returns a Rust `Result`: a failure
//! anywhere in the tree becomes a [`Jx::Error`] value at the point of
//! failure, which then propagates upward exactly like any other value,
//! per the contract described in [`crate::function`].

use crate::function;
use crate::value::{ArrayItem, Comprehension, Jx, JxObject, Op, Operator};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Options threaded through an `eval` call.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalOptions {
    /// Gates `fetch()`/`listdir()`. Never a global: the catalog server
    /// enables this only for trusted, operator-supplied expressions, never
    /// for producer-supplied record fields.
    pub external_functions: bool,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Evaluates `expr` against `context`, which must be an object or
/// [`Jx::Null`].
///
/// # Examples
///
/// ```
/// use deltadb_jx::Jx;
/// use deltadb_jx::eval::eval;
///
/// let one = Jx::Integer(1);
/// assert_eq!(eval(&one, &Jx::Null), Jx::Integer(1));
/// ```
#[must_use]
pub fn eval(expr: &Jx, context: &Jx) -> Jx {
    eval_with(expr, context, EvalOptions::default())
}

/// Evaluates `expr` against `context`, with the given [`EvalOptions`].
#[must_use]
pub fn eval_with(expr: &Jx, context: &Jx, opts: EvalOptions) -> Jx {
    match expr {
        Jx::Null
        | Jx::Boolean(_)
        | Jx::Integer(_)
        | Jx::Double(_)
        | Jx::String(_)
        | Jx::Error(_) => expr.clone(),

        Jx::Symbol(name, line) => resolve(name, *line, context),

        Jx::Array(items) => eval_array(items, context, opts),
        Jx::Object(object) => eval_object(object, context, opts),

        Jx::Operator(op) => eval_operator(op, context, opts),
    }
}

fn resolve(name: &str, line: u32, context: &Jx) -> Jx {
    match context.lookup(name) {
        Some(value) => value.clone(),
        None => Jx::error(format!("on line {line}, {name}: undefined symbol")),
    }
}

fn eval_array(items: &[ArrayItem], context: &Jx, opts: EvalOptions) -> Jx {
    let mut out = Vec::new();
    for item in items {
        match &item.comprehension {
            None => {
                let value = eval_with(&item.value, context, opts);
                if value.is_error() {
                    return value;
                }
                out.push(value);
            }
            Some(comprehension) => {
                if let Err(e) = expand_comprehension(
                    &item.value,
                    comprehension,
                    context,
                    opts,
                    &mut out,
                ) {
                    return e;
                }
            }
        }
    }
    Jx::array(out)
}

fn eval_object(object: &JxObject, context: &Jx, opts: EvalOptions) -> Jx {
    let mut out = JxObject::new();
    for item in object.items() {
        match &item.comprehension {
            None => {
                let key = eval_with(&item.key, context, opts);
                if key.is_error() {
                    return key;
                }
                let Jx::String(key) = key else {
                    return Jx::error("object key must evaluate to a string");
                };
                let value = eval_with(&item.value, context, opts);
                if value.is_error() {
                    return value;
                }
                out.insert(key, value);
            }
            Some(comprehension) => {
                let mut pairs = Vec::new();
                if let Err(e) = expand_object_comprehension(
                    &item.key,
                    &item.value,
                    comprehension,
                    context,
                    opts,
                    &mut pairs,
                ) {
                    return e;
                }
                for (key, value) in pairs {
                    out.insert(key, value);
                }
            }
        }
    }
    Jx::Object(out)
}

/// Expands a single comprehension-bearing array item into zero or more
/// evaluated elements, pushed onto `out`. Returns `Err` with the error
/// value on the first failure, which aborts the whole enclosing literal.
fn expand_comprehension(
    body: &Jx,
    comprehension: &Comprehension,
    context: &Jx,
    opts: EvalOptions,
    out: &mut Vec<Jx>,
) -> Result<(), Jx> {
    let source = eval_with(&comprehension.source, context, opts);
    if source.is_error() {
        return Err(source);
    }
    let Jx::Array(elements) = source else {
        return Err(Jx::error("comprehension source must be an array"));
    };
    for element in elements {
        let element_value = eval_with(&element.value, context, opts);
        if element_value.is_error() {
            return Err(element_value);
        }
        let mut inner_context = context.clone();
        bind(&mut inner_context, &comprehension.var, element_value);

        if let Some(condition) = &comprehension.condition {
            let keep = eval_with(condition, &inner_context, opts);
            if keep.is_error() {
                return Err(keep);
            }
            if keep != Jx::Boolean(true) {
                continue;
            }
        }

        match &comprehension.next {
            Some(next) => {
                expand_comprehension(body, next, &inner_context, opts, out)?;
            }
            None => {
                let value = eval_with(body, &inner_context, opts);
                if value.is_error() {
                    return Err(value);
                }
                out.push(value);
            }
        }
    }
    Ok(())
}

fn expand_object_comprehension(
    key: &Jx,
    value: &Jx,
    comprehension: &Comprehension,
    context: &Jx,
    opts: EvalOptions,
    out: &mut Vec<(String, Jx)>,
) -> Result<(), Jx> {
    let source = eval_with(&comprehension.source, context, opts);
    if source.is_error() {
        return Err(source);
    }
    let Jx::Array(elements) = source else {
        return Err(Jx::error("comprehension source must be an array"));
    };
    for element in elements {
        let element_value = eval_with(&element.value, context, opts);
        if element_value.is_error() {
            return Err(element_value);
        }
        let mut inner_context = context.clone();
        bind(&mut inner_context, &comprehension.var, element_value);

        if let Some(condition) = &comprehension.condition {
            let keep = eval_with(condition, &inner_context, opts);
            if keep.is_error() {
                return Err(keep);
            }
            if keep != Jx::Boolean(true) {
                continue;
            }
        }

        match &comprehension.next {
            Some(next) => {
                expand_object_comprehension(key, value, next, &inner_context, opts, out)?;
            }
            None => {
                let k = eval_with(key, &inner_context, opts);
                if k.is_error() {
                    return Err(k);
                }
                let Jx::String(k) = k else {
                    return Err(Jx::error("object key must evaluate to a string"));
                };
                let v = eval_with(value, &inner_context, opts);
                if v.is_error() {
                    return Err(v);
                }
                out.push((k, v));
            }
        }
    }
    Ok(())
}

/// Binds `name` to `value` in `context`, which must already be (or become)
/// an object.
fn bind(context: &mut Jx, name: &str, value: Jx) {
    if !matches!(context, Jx::Object(_)) {
        *context = Jx::object([]);
    }
    if let Jx::Object(object) = context {
        object.insert(name.to_string(), value);
    }
}

fn eval_operator(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    match op.op {
        Op::And => eval_logical(op, context, opts, true),
        Op::Or => eval_logical(op, context, opts, false),
        Op::Neg => eval_neg(op, context, opts),
        Op::Not => eval_not(op, context, opts),
        Op::Lookup => eval_lookup(op, context, opts),
        Op::Call => eval_call(op, context, opts),
        Op::Dot => eval_dot(op, context, opts),
        Op::Colon => Jx::error(format!("on line {}, ':' is only valid inside '[...]'", op.line)),
        _ => eval_binary(op, context, opts),
    }
}

fn eval_logical(op: &Operator, context: &Jx, opts: EvalOptions, is_and: bool) -> Jx {
    let Some(left) = &op.left else {
        return Jx::error("and/or require two operands");
    };
    let left = eval_with(left, context, opts);
    if left.is_error() {
        return left;
    }
    let truthy = is_truthy(&left);
    if truthy != is_and {
        // `and` short-circuits on a falsy left side; `or` on a truthy one.
        return Jx::Boolean(truthy);
    }
    let right = eval_with(&op.right, context, opts);
    if right.is_error() {
        return right;
    }
    Jx::Boolean(is_truthy(&right))
}

fn is_truthy(value: &Jx) -> bool {
    !matches!(value, Jx::Null | Jx::Boolean(false))
}

fn eval_neg(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    match eval_with(&op.right, context, opts) {
        Jx::Integer(v) => Jx::Integer(-v),
        Jx::Double(v) => Jx::Double(-v),
        err @ Jx::Error(_) => err,
        other => Jx::error(format!(
            "on line {}, cannot negate a {}",
            op.line,
            other.type_name()
        )),
    }
}

fn eval_not(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    match eval_with(&op.right, context, opts) {
        err @ Jx::Error(_) => err,
        other => Jx::Boolean(!is_truthy(&other)),
    }
}

fn eval_lookup(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    let Some(left) = &op.left else {
        return Jx::error("lookup requires a left operand");
    };
    let base = eval_with(left, context, opts);
    if base.is_error() {
        return base;
    }

    if let Jx::Operator(slice_op) = op.right.as_ref() {
        if slice_op.op == Op::Colon {
            return eval_slice(&base, slice_op, context, opts);
        }
    }

    let index = eval_with(&op.right, context, opts);
    if index.is_error() {
        return index;
    }

    match (&base, &index) {
        (Jx::Object(object), Jx::String(key)) => object
            .get(key)
            .cloned()
            .unwrap_or_else(|| Jx::error(format!("on line {}, {key}: no such field", op.line))),
        (Jx::Array(items), Jx::Integer(i)) => {
            let len = items.len() as i64;
            let idx = if *i < 0 { i + len } else { *i };
            if idx < 0 || idx >= len {
                Jx::error(format!("on line {}, array index {i} out of range", op.line))
            } else {
                (*items[idx as usize].value).clone()
            }
        }
        _ => Jx::error(format!(
            "on line {}, cannot index a {} with a {}",
            op.line,
            base.type_name(),
            index.type_name()
        )),
    }
}

fn eval_slice(base: &Jx, slice_op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    let line = slice_op.line;
    let Jx::Array(items) = base else {
        return Jx::error(format!("on line {line}, slicing requires an array"));
    };
    let len = items.len() as i64;

    let bound = |expr: Option<&Jx>, default: i64| -> Result<i64, Jx> {
        match expr {
            None => Ok(default),
            Some(e) => match eval_with(e, context, opts) {
                Jx::Integer(i) => Ok(if i < 0 { (i + len).max(0) } else { i.min(len) }),
                err @ Jx::Error(_) => Err(err),
                other => Err(Jx::error(format!(
                    "on line {line}, slice bound must be an integer, got {}",
                    other.type_name()
                ))),
            },
        }
    };

    // An omitted stop bound is represented by the parser as a bare `Null`
    // literal, since the `Colon` node's `right` operand is not optional.
    let stop_expr = (!matches!(slice_op.right.as_ref(), Jx::Null)).then_some(slice_op.right.as_ref());

    let start = match bound(slice_op.left.as_deref(), 0) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let stop = match bound(stop_expr, len) {
        Ok(v) => v,
        Err(e) => return e,
    };

    if start >= stop {
        return Jx::array([]);
    }
    Jx::array(
        items[start as usize..stop as usize]
            .iter()
            .map(|item| (*item.value).clone()),
    )
}

fn eval_binary(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    let Some(left) = &op.left else {
        return Jx::error("binary operator requires two operands");
    };
    let left = eval_with(left, context, opts);
    if left.is_error() {
        return left;
    }
    let right = eval_with(&op.right, context, opts);
    if right.is_error() {
        return right;
    }

    match op.op {
        Op::Eq => Jx::Boolean(left == right),
        Op::Ne => Jx::Boolean(left != right),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => eval_compare(op.op, &left, &right, op.line),
        Op::Add => eval_add(&left, &right, op.line),
        Op::Sub | Op::Mul | Op::Div | Op::Mod => eval_arith(op.op, &left, &right, op.line),
        _ => unreachable!("non-binary operator routed to eval_binary"),
    }
}

fn eval_compare(op: Op, left: &Jx, right: &Jx, line: u32) -> Jx {
    let ordering = match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => match (left, right) {
            (Jx::String(a), Jx::String(b)) => Some(a.cmp(b)),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return Jx::error(format!(
            "on line {line}, cannot compare {} and {}",
            left.type_name(),
            right.type_name()
        ));
    };
    use std::cmp::Ordering::{Equal, Greater, Less};
    let result = match (op, ordering) {
        (Op::Lt, Less) | (Op::Le, Less | Equal) | (Op::Gt, Greater) | (Op::Ge, Greater | Equal) => {
            true
        }
        _ => false,
    };
    Jx::Boolean(result)
}

fn eval_add(left: &Jx, right: &Jx, line: u32) -> Jx {
    match (left, right) {
        (Jx::Array(a), Jx::Array(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            Jx::Array(items)
        }
        (Jx::String(a), Jx::String(b)) => Jx::String(format!("{a}{b}")),
        (Jx::String(a), other) => Jx::String(format!("{a}{}", crate::print::to_string(other))),
        (other, Jx::String(b)) => Jx::String(format!("{}{b}", crate::print::to_string(other))),
        _ => eval_arith(Op::Add, left, right, line),
    }
}

fn eval_arith(op: Op, left: &Jx, right: &Jx, line: u32) -> Jx {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Jx::error(format!(
            "on line {line}, cannot apply {} to {} and {}",
            op.as_str(),
            left.type_name(),
            right.type_name()
        ));
    };
    if matches!(op, Op::Div | Op::Mod) && b == 0.0 {
        return Jx::error(format!("on line {line}, division by zero"));
    }
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Mod => a % b,
        _ => unreachable!("non-arithmetic operator routed to eval_arith"),
    };
    if let (Jx::Integer(_), Jx::Integer(_)) = (left, right) {
        Jx::Integer(result as i64)
    } else {
        Jx::Double(result)
    }
}

fn eval_dot(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    let Some(receiver) = &op.left else {
        return Jx::error("dot requires a left operand");
    };
    let Jx::Operator(call) = op.right.as_ref() else {
        return Jx::error("dot requires a call on the right");
    };
    if call.op != Op::Call {
        return Jx::error("dot requires a call on the right");
    }
    let mut args = vec![ArrayItem::value((**receiver).clone())];
    if let Jx::Array(rest) = call.right.as_ref() {
        args.extend(rest.iter().cloned());
    }
    let synthesized = Operator {
        op: Op::Call,
        left: call.left.clone(),
        right: Box::new(Jx::Array(args)),
        line: op.line,
    };
    eval_call(&synthesized, context, opts)
}

fn eval_call(op: &Operator, context: &Jx, opts: EvalOptions) -> Jx {
    let Some(name_expr) = &op.left else {
        return Jx::error("call requires a function name");
    };
    let Jx::Symbol(name, _) = name_expr.as_ref() else {
        return Jx::error("call target must be a function name");
    };
    let Jx::Array(raw_args) = op.right.as_ref() else {
        return Jx::error("call arguments must be a list");
    };

    if function::is_deferred(name) {
        return eval_deferred(name, raw_args, context, opts, op.line);
    }

    if !function::is_known(name) {
        return Jx::error(format!("on line {}, {name}: undefined function", op.line));
    }

    let mut args = Vec::with_capacity(raw_args.len());
    for raw in raw_args {
        let value = eval_with(&raw.value, context, opts);
        if value.is_error() {
            return value;
        }
        args.push(value);
    }

    function::call(name, &args, opts.external_functions)
        .unwrap_or_else(|| Jx::error(format!("on line {}, {name}: undefined function", op.line)))
}

/// `select`/`where` (identical) and `project`: the list argument is
/// evaluated; the predicate/body argument is evaluated once per element
/// with the element's fields merged into the context, per §4.5.
fn eval_deferred(
    name: &str,
    raw_args: &[ArrayItem],
    context: &Jx,
    opts: EvalOptions,
    line: u32,
) -> Jx {
    let [list_expr, body_expr] = raw_args else {
        return Jx::error(format!("on line {line}, {name}: expects two arguments"));
    };

    let list = eval_with(&list_expr.value, context, opts);
    if list.is_error() {
        return list;
    }
    let Jx::Array(items) = list else {
        return Jx::error(format!("on line {line}, {name}: first argument must be an array"));
    };

    let mut out = Vec::new();
    for item in &items {
        let element = (*item.value).clone();
        let element_context = match (&context, &element) {
            (Jx::Object(base), Jx::Object(fields)) => Jx::Object(base.merged_with(fields)),
            (Jx::Null, Jx::Object(fields)) => Jx::Object(fields.clone()),
            _ => element.clone(),
        };

        let result = eval_with(&body_expr.value, &element_context, opts);
        if result.is_error() {
            return result;
        }

        match name {
            "select" | "where" => {
                if is_truthy(&result) {
                    out.push(element);
                }
            }
            "project" => out.push(result),
            _ => unreachable!("is_deferred only admits select/where/project"),
        }
    }
    Jx::array(out)
}
