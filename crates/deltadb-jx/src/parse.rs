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

//! Recursive-descent parser turning source text into a [`Jx`] expression
//! tree.
//!
//! Parsing never panics: on the first syntax error, [`Parser::parse_value`]
//! records the error's line and message (retrievable via [`Parser::error`])
//! and returns `None`. A caller driving a stream of values (e.g. one per
//! line of a log file) creates a fresh [`Parser`] per value; this type does
//! not attempt error recovery within a single value.

mod lexer;
mod token;

use deltadb_diagnostic::{Diagnostic, Location, Severity};
use token::Kind;

use crate::value::{ArrayItem, Comprehension, Jx, JxObject, ObjectItem, Op, Operator};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Parsing mode switches.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// When `true`, a bare identifier that is not `true`, `false`, or `null`
    /// is a syntax error rather than a [`Jx::Symbol`]. Incoming catalog
    /// records are parsed in strict mode: they carry data, never queries.
    pub strict: bool,
    /// When `true`, only a single unary/postfix value is consumed and
    /// binary operators are rejected; used to replay log entries as plain
    /// data without accidentally parsing adjacent tokens as an expression.
    pub static_mode: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: false, static_mode: false }
    }
}

/// A one-shot recursive-descent parser over a single source buffer.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    opts: ParseOptions,
    error: Option<(u32, String)>,
}

use token::Token;

impl Parser {
    /// Creates a parser in the default (permissive, non-static) mode.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Creates a parser with explicit options.
    #[must_use]
    pub fn with_options(source: &str, opts: ParseOptions) -> Self {
        let (tokens, lex_error) = lexer::lex(source);
        Self { tokens, pos: 0, opts, error: lex_error }
    }

    /// Returns the first syntax error recorded so far, if any, as a
    /// `(line, message)` pair.
    #[must_use]
    pub fn error(&self) -> Option<(u32, String)> {
        self.error.clone()
    }

    /// Parses and returns a single value, or `None` if a syntax error was
    /// encountered (before or during this call).
    pub fn parse_value(&mut self) -> Option<Jx> {
        if self.error.is_some() {
            return None;
        }
        let value = if self.opts.static_mode { self.parse_unary() } else { self.parse_or() };
        match value {
            Some(value) if self.error.is_none() => Some(value),
            _ => None,
        }
    }

    // -- token helpers --------------------------------------------------

    fn peek(&self) -> &Kind {
        &self.tokens[self.pos].kind
    }

    fn line(&self) -> u32 {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn fail(&mut self, message: impl Into<String>) -> Option<Jx> {
        self.error.get_or_insert((self.line(), message.into()));
        None
    }

    fn expect(&mut self, kind: &Kind, context: &str) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            self.fail(format!("expected {context}"));
            false
        }
    }

    // -- binary precedence levels, loosest first -------------------------

    fn parse_or(&mut self) -> Option<Jx> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Kind::OrOr) {
            let line = self.line();
            self.advance();
            let right = self.parse_and()?;
            left = Jx::Operator(Operator::binary(Op::Or, left, right, line));
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Jx> {
        let mut left = self.parse_compare()?;
        while matches!(self.peek(), Kind::AndAnd) {
            let line = self.line();
            self.advance();
            let right = self.parse_compare()?;
            left = Jx::Operator(Operator::binary(Op::And, left, right, line));
        }
        Some(left)
    }

    fn parse_compare(&mut self) -> Option<Jx> {
        let mut left = self.parse_add()?;
        loop {
            let op = match self.peek() {
                Kind::EqEq => Op::Eq,
                Kind::Ne => Op::Ne,
                Kind::Lt => Op::Lt,
                Kind::Le => Op::Le,
                Kind::Gt => Op::Gt,
                Kind::Ge => Op::Ge,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_add()?;
            left = Jx::Operator(Operator::binary(op, left, right, line));
        }
        Some(left)
    }

    fn parse_add(&mut self) -> Option<Jx> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek() {
                Kind::Plus => Op::Add,
                Kind::Minus => Op::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_mul()?;
            left = Jx::Operator(Operator::binary(op, left, right, line));
        }
        Some(left)
    }

    fn parse_mul(&mut self) -> Option<Jx> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Kind::Star => Op::Mul,
                Kind::Slash => Op::Div,
                Kind::Percent => Op::Mod,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_unary()?;
            left = Jx::Operator(Operator::binary(op, left, right, line));
        }
        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Jx> {
        match self.peek() {
            Kind::Minus => {
                let line = self.line();
                self.advance();
                let operand = self.parse_unary()?;
                Some(match operand {
                    Jx::Integer(value) => Jx::Integer(-value),
                    Jx::Double(value) => Jx::Double(-value),
                    other => Jx::Operator(Operator::unary(Op::Neg, other, line)),
                })
            }
            Kind::Plus => {
                self.advance();
                self.parse_unary()
            }
            Kind::Bang => {
                let line = self.line();
                self.advance();
                let operand = self.parse_unary()?;
                Some(Jx::Operator(Operator::unary(Op::Not, operand, line)))
            }
            _ => self.parse_postfix(),
        }
    }

    // -- postfix: indexing, slicing, calls, dot-calls --------------------

    fn parse_postfix(&mut self) -> Option<Jx> {
        let mut value = self.parse_atomic()?;
        loop {
            match self.peek() {
                Kind::LBracket => {
                    let line = self.line();
                    self.advance();
                    let index = self.parse_index()?;
                    if !self.expect(&Kind::RBracket, "']' to close index") {
                        return None;
                    }
                    value = Jx::Operator(Operator::binary(Op::Lookup, value, index, line));
                }
                Kind::LParen => {
                    let line = self.line();
                    self.advance();
                    let args = self.parse_args()?;
                    value = Jx::Operator(Operator::binary(Op::Call, value, Jx::array(args), line));
                }
                Kind::Dot => {
                    let line = self.line();
                    self.advance();
                    let Kind::Ident(name) = self.peek().clone() else {
                        return self.fail("expected method name after '.'");
                    };
                    self.advance();
                    if !self.expect(&Kind::LParen, "'(' after method name") {
                        return None;
                    }
                    let args = self.parse_args()?;
                    let call = Jx::Operator(Operator::binary(
                        Op::Call,
                        Jx::Symbol(name, line),
                        Jx::array(args),
                        line,
                    ));
                    value = Jx::Operator(Operator::binary(Op::Dot, value, call, line));
                }
                _ => break,
            }
        }
        Some(value)
    }

    /// Parses the contents of a `[...]` index: either a plain value, or a
    /// `start:stop` slice where either bound may be omitted.
    fn parse_index(&mut self) -> Option<Jx> {
        let line = self.line();
        if matches!(self.peek(), Kind::Colon) {
            self.advance();
            let stop = if matches!(self.peek(), Kind::RBracket) { Jx::Null } else { self.parse_or()? };
            return Some(Jx::Operator(Operator { op: Op::Colon, left: None, right: Box::new(stop), line }));
        }
        let start = self.parse_or()?;
        if matches!(self.peek(), Kind::Colon) {
            self.advance();
            let stop = if matches!(self.peek(), Kind::RBracket) { Jx::Null } else { self.parse_or()? };
            return Some(Jx::Operator(Operator::binary(Op::Colon, start, stop, line)));
        }
        Some(start)
    }

    fn parse_args(&mut self) -> Option<Vec<Jx>> {
        let mut args = Vec::new();
        if matches!(self.peek(), Kind::RParen) {
            self.advance();
            return Some(args);
        }
        loop {
            args.push(self.parse_or()?);
            match self.peek() {
                Kind::Comma => {
                    self.advance();
                }
                Kind::RParen => {
                    self.advance();
                    break;
                }
                _ => return self.fail("expected ',' or ')' in argument list").map(|_| Vec::new()),
            }
        }
        Some(args)
    }

    // -- atomic values ----------------------------------------------------

    fn parse_atomic(&mut self) -> Option<Jx> {
        let line = self.line();
        match self.peek().clone() {
            Kind::Null => {
                self.advance();
                Some(Jx::Null)
            }
            Kind::True => {
                self.advance();
                Some(Jx::Boolean(true))
            }
            Kind::False => {
                self.advance();
                Some(Jx::Boolean(false))
            }
            Kind::Integer(value) => {
                self.advance();
                Some(Jx::Integer(value))
            }
            Kind::Double(value) => {
                self.advance();
                Some(Jx::Double(value))
            }
            Kind::String(value) => {
                self.advance();
                Some(Jx::String(value))
            }
            Kind::Ident(name) => {
                self.advance();
                if self.opts.strict {
                    return self.fail(format!("unquoted symbol '{name}' not allowed here"));
                }
                Some(Jx::Symbol(name, line))
            }
            Kind::LBracket => self.parse_array(),
            Kind::LBrace => self.parse_object(),
            Kind::LParen => {
                self.advance();
                let inner = self.parse_or()?;
                if !self.expect(&Kind::RParen, "')' to close parenthesized expression") {
                    return None;
                }
                Some(inner)
            }
            other => self.fail(format!("unexpected token {other:?}")),
        }
    }

    fn parse_array(&mut self) -> Option<Jx> {
        self.advance();
        let mut items = Vec::new();
        if matches!(self.peek(), Kind::RBracket) {
            self.advance();
            return Some(Jx::Array(items));
        }
        loop {
            let value = self.parse_or()?;
            let comprehension = self.parse_comprehension_opt()?;
            items.push(match comprehension {
                Some(c) => ArrayItem::with_comprehension(value, c),
                None => ArrayItem::value(value),
            });
            match self.peek() {
                Kind::Comma => {
                    self.advance();
                }
                Kind::RBracket => {
                    self.advance();
                    break;
                }
                _ => return self.fail("expected ',' or ']' in array literal"),
            }
        }
        Some(Jx::Array(items))
    }

    fn parse_object(&mut self) -> Option<Jx> {
        self.advance();
        let mut items = Vec::new();
        if matches!(self.peek(), Kind::RBrace) {
            self.advance();
            return Some(Jx::Object(JxObject::from_items(items)));
        }
        loop {
            let key = self.parse_or()?;
            if !self.expect(&Kind::Colon, "':' after object key") {
                return None;
            }
            let value = self.parse_or()?;
            let comprehension = self.parse_comprehension_opt()?;
            items.push(match comprehension {
                Some(c) => ObjectItem::with_comprehension(key, value, c),
                None => ObjectItem::pair(key, value),
            });
            match self.peek() {
                Kind::Comma => {
                    self.advance();
                }
                Kind::RBrace => {
                    self.advance();
                    break;
                }
                _ => return self.fail("expected ',' or '}' in object literal"),
            }
        }
        Some(Jx::Object(JxObject::from_items(items)))
    }

    /// Parses an optional `for var in source (if cond)?`, chaining into
    /// further nested `for` clauses. Returns `Ok(None)` when no `for`
    /// follows.
    fn parse_comprehension_opt(&mut self) -> Option<Option<Comprehension>> {
        let Kind::Ident(word) = self.peek().clone() else { return Some(None) };
        if word != "for" {
            return Some(None);
        }
        self.advance();
        let Kind::Ident(var) = self.peek().clone() else {
            return self.fail("expected loop variable after 'for'").map(|_| None);
        };
        self.advance();
        let Kind::Ident(in_word) = self.peek().clone() else {
            return self.fail("expected 'in' after loop variable").map(|_| None);
        };
        if in_word != "in" {
            return self.fail("expected 'in' after loop variable").map(|_| None);
        }
        self.advance();
        let source = self.parse_or()?;
        let condition = if let Kind::Ident(if_word) = self.peek().clone() {
            if if_word == "if" {
                self.advance();
                Some(Box::new(self.parse_or()?))
            } else {
                None
            }
        } else {
            None
        };
        let next = self.parse_comprehension_opt()?.map(Box::new);
        Some(Some(Comprehension { var, source: Box::new(source), condition, next }))
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Parses a single value from `source` with the given options, returning
/// the value and, on failure, the `(line, message)` of the first error.
pub fn parse(source: &str, opts: ParseOptions) -> (Option<Jx>, Option<(u32, String)>) {
    let mut parser = Parser::with_options(source, opts);
    let value = parser.parse_value();
    (value, parser.error())
}

/// Like [`parse`], but reports a failure as a [`Diagnostic`] rather than a
/// bare `(line, message)` pair, for callers (log replay, update ingestion)
/// that want to log or surface parse failures uniformly with the rest of
/// the system's diagnostics.
pub fn parse_with_diagnostic(source: &str, opts: ParseOptions) -> Result<Jx, Diagnostic> {
    let (value, error) = parse(source, opts);
    match (value, error) {
        (Some(value), _) => Ok(value),
        (None, Some((line, message))) => Err(Diagnostic::new(Severity::Error, message).location(Location::new("<jx>", (line, 0)))),
        (None, None) => Err(Diagnostic::new(Severity::Error, "empty or incomplete expression").location(Location::new("<jx>", (0, 0)))),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literals() {
        assert_eq!(Parser::new("null").parse_value(), Some(Jx::Null));
        assert_eq!(Parser::new("true").parse_value(), Some(Jx::Boolean(true)));
        assert_eq!(Parser::new("42").parse_value(), Some(Jx::Integer(42)));
        assert_eq!(Parser::new("\"hi\"").parse_value(), Some(Jx::String("hi".to_string())));
    }

    #[test]
    fn folds_unary_minus_into_numeric_literal() {
        assert_eq!(Parser::new("-5").parse_value(), Some(Jx::Integer(-5)));
        assert_eq!(Parser::new("-5.5").parse_value(), Some(Jx::Double(-5.5)));
    }

    #[test]
    fn respects_precedence() {
        let value = Parser::new("1 + 2 * 3").parse_value().unwrap();
        assert_eq!(crate::print::to_string(&value), "1 + 2 * 3");
        assert_eq!(crate::eval::eval(&value, &Jx::Null), Jx::Integer(7));
    }

    #[test]
    fn parses_array_and_object_literals() {
        let array = Parser::new("[1, 2, 3]").parse_value().unwrap();
        assert_eq!(array.len(), Some(3));

        let object = Parser::new(r#"{"a": 1, "b": 2}"#).parse_value().unwrap();
        assert_eq!(object.lookup("a"), Some(&Jx::Integer(1)));
    }

    #[test]
    fn strict_mode_rejects_bare_symbols() {
        let mut parser = Parser::with_options("x", ParseOptions { strict: true, static_mode: false });
        assert!(parser.parse_value().is_none());
        assert!(parser.error().is_some());
    }

    #[test]
    fn permissive_mode_accepts_symbols() {
        let value = Parser::new("x + 1").parse_value().unwrap();
        let context = Jx::object([("x".to_string(), Jx::Integer(4))]);
        assert_eq!(crate::eval::eval(&value, &context), Jx::Integer(5));
    }

    #[test]
    fn static_mode_parses_single_value_without_binary_operators() {
        let mut parser =
            Parser::with_options("-5", ParseOptions { strict: false, static_mode: true });
        assert_eq!(parser.parse_value(), Some(Jx::Integer(-5)));
    }

    #[test]
    fn dot_call_lowers_to_call_with_prepended_receiver() {
        let value = Parser::new("x.len()").parse_value().unwrap();
        let context = Jx::object([("x".to_string(), Jx::array([Jx::Integer(1), Jx::Integer(2)]))]);
        assert_eq!(crate::eval::eval(&value, &context), Jx::Integer(2));
    }

    #[test]
    fn parses_array_comprehension() {
        let value = Parser::new("[x * 2 for x in [1, 2, 3]]").parse_value().unwrap();
        let result = crate::eval::eval(&value, &Jx::Null);
        assert_eq!(result, Jx::array([Jx::Integer(2), Jx::Integer(4), Jx::Integer(6)]));
    }

    #[test]
    fn parses_slice_with_omitted_bounds() {
        let value = Parser::new("x[1:]").parse_value().unwrap();
        let context = Jx::object([(
            "x".to_string(),
            Jx::array([Jx::Integer(1), Jx::Integer(2), Jx::Integer(3)]),
        )]);
        let result = crate::eval::eval(&value, &context);
        assert_eq!(result, Jx::array([Jx::Integer(2), Jx::Integer(3)]));
    }

    #[test]
    fn reports_syntax_error_location() {
        let mut parser = Parser::new("1 +");
        assert!(parser.parse_value().is_none());
        let (line, _) = parser.error().unwrap();
        assert_eq!(line, 1);
    }

    #[test]
    fn parse_with_diagnostic_reports_a_located_error() {
        let diagnostic = parse_with_diagnostic("1 +", ParseOptions::default()).unwrap_err();
        assert_eq!(diagnostic.location.unwrap().range.start.line, 1);
    }

    #[test]
    fn parse_with_diagnostic_returns_the_value_on_success() {
        assert_eq!(parse_with_diagnostic("42", ParseOptions::default()).unwrap(), Jx::Integer(42));
    }
}
