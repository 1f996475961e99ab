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

//! Single-pass lexer turning source text into a flat token vector.

use super::token::{Kind, Token};

/// Maximum length of a single quoted string literal, in bytes. Guards
/// against unbounded allocation from a truncated or adversarial payload.
const MAX_STRING_LEN: usize = 64 * 1024;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Tokenizes `source`, returning the token vector (always terminated by a
/// single [`Kind::Eof`]) and the first lexical error encountered, if any.
pub fn lex(source: &str) -> (Vec<Token>, Option<(u32, String)>) {
    let bytes = source.as_bytes();
    let mut pos = 0;
    let mut line = 1u32;
    let mut tokens = Vec::new();
    let mut error = None;

    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b' ' | b'\t' | b'\r' => pos += 1,
            b'\n' => {
                line += 1;
                pos += 1;
            }
            b'#' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'0'..=b'9' => {
                let start = pos;
                let mut is_double = false;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                if pos < bytes.len() && bytes[pos] == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
                {
                    is_double = true;
                    pos += 1;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
                if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
                    let mut look = pos + 1;
                    if look < bytes.len() && matches!(bytes[look], b'+' | b'-') {
                        look += 1;
                    }
                    if look < bytes.len() && bytes[look].is_ascii_digit() {
                        is_double = true;
                        pos = look;
                        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                            pos += 1;
                        }
                    }
                }
                let text = &source[start..pos];
                if is_double {
                    match text.parse::<f64>() {
                        Ok(value) => tokens.push(Token { kind: Kind::Double(value), line }),
                        Err(_) => {
                            error.get_or_insert((line, format!("malformed number literal '{text}'")));
                        }
                    }
                } else {
                    match text.parse::<i64>() {
                        Ok(value) => tokens.push(Token { kind: Kind::Integer(value), line }),
                        Err(_) => {
                            error.get_or_insert((line, format!("integer literal '{text}' out of range")));
                        }
                    }
                }
            }
            b'"' => {
                pos += 1;
                let start_line = line;
                let mut value = String::new();
                let mut closed = false;
                while pos < bytes.len() {
                    match bytes[pos] {
                        b'"' => {
                            pos += 1;
                            closed = true;
                            break;
                        }
                        b'\\' if pos + 1 < bytes.len() => {
                            pos += 1;
                            match bytes[pos] {
                                b'n' => value.push('\n'),
                                b't' => value.push('\t'),
                                b'r' => value.push('\r'),
                                b'"' => value.push('"'),
                                b'\\' => value.push('\\'),
                                b'/' => value.push('/'),
                                b'u' if pos + 4 < bytes.len() => {
                                    let hex = &source[pos + 1..pos + 5];
                                    if let Ok(code) = u32::from_str_radix(hex, 16) {
                                        if let Some(ch) = char::from_u32(code) {
                                            value.push(ch);
                                        }
                                        pos += 4;
                                    }
                                }
                                other => value.push(other as char),
                            }
                            pos += 1;
                        }
                        b'\n' => {
                            line += 1;
                            value.push('\n');
                            pos += 1;
                        }
                        _ => {
                            let ch_len = utf8_len(bytes[pos]);
                            value.push_str(&source[pos..pos + ch_len]);
                            pos += ch_len;
                        }
                    }
                    if value.len() > MAX_STRING_LEN {
                        error.get_or_insert((start_line, "string literal exceeds maximum length".to_string()));
                        break;
                    }
                }
                if !closed && error.is_none() {
                    error.get_or_insert((start_line, "unterminated string literal".to_string()));
                }
                tokens.push(Token { kind: Kind::String(value), line: start_line });
            }
            b'[' => push(&mut tokens, Kind::LBracket, line, &mut pos),
            b']' => push(&mut tokens, Kind::RBracket, line, &mut pos),
            b'{' => push(&mut tokens, Kind::LBrace, line, &mut pos),
            b'}' => push(&mut tokens, Kind::RBrace, line, &mut pos),
            b'(' => push(&mut tokens, Kind::LParen, line, &mut pos),
            b')' => push(&mut tokens, Kind::RParen, line, &mut pos),
            b',' => push(&mut tokens, Kind::Comma, line, &mut pos),
            b':' => push(&mut tokens, Kind::Colon, line, &mut pos),
            b'.' if !bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                push(&mut tokens, Kind::Dot, line, &mut pos);
            }
            b'+' => push(&mut tokens, Kind::Plus, line, &mut pos),
            b'-' => push(&mut tokens, Kind::Minus, line, &mut pos),
            b'*' => push(&mut tokens, Kind::Star, line, &mut pos),
            b'/' => push(&mut tokens, Kind::Slash, line, &mut pos),
            b'%' => push(&mut tokens, Kind::Percent, line, &mut pos),
            b'=' if bytes.get(pos + 1) == Some(&b'=') => {
                tokens.push(Token { kind: Kind::EqEq, line });
                pos += 2;
            }
            b'!' if bytes.get(pos + 1) == Some(&b'=') => {
                tokens.push(Token { kind: Kind::Ne, line });
                pos += 2;
            }
            b'!' => push(&mut tokens, Kind::Bang, line, &mut pos),
            b'<' if bytes.get(pos + 1) == Some(&b'=') => {
                tokens.push(Token { kind: Kind::Le, line });
                pos += 2;
            }
            b'<' => push(&mut tokens, Kind::Lt, line, &mut pos),
            b'>' if bytes.get(pos + 1) == Some(&b'=') => {
                tokens.push(Token { kind: Kind::Ge, line });
                pos += 2;
            }
            b'>' => push(&mut tokens, Kind::Gt, line, &mut pos),
            b'&' if bytes.get(pos + 1) == Some(&b'&') => {
                tokens.push(Token { kind: Kind::AndAnd, line });
                pos += 2;
            }
            b'|' if bytes.get(pos + 1) == Some(&b'|') => {
                tokens.push(Token { kind: Kind::OrOr, line });
                pos += 2;
            }
            _ if c.is_ascii_alphabetic() || c == b'_' => {
                let start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                    pos += 1;
                }
                let word = &source[start..pos];
                let kind = match word {
                    "null" => Kind::Null,
                    "true" => Kind::True,
                    "false" => Kind::False,
                    "and" => Kind::AndAnd,
                    "or" => Kind::OrOr,
                    "not" => Kind::Bang,
                    _ => Kind::Ident(word.to_string()),
                };
                tokens.push(Token { kind, line });
            }
            _ => {
                error.get_or_insert((line, format!("unexpected character '{}'", c as char)));
                pos += 1;
            }
        }
    }
    tokens.push(Token { kind: Kind::Eof, line });
    (tokens, error)
}

fn push(tokens: &mut Vec<Token>, kind: Kind, line: u32, pos: &mut usize) {
    tokens.push(Token { kind, line });
    *pos += 1;
}

/// Returns the byte length of a UTF-8 sequence given its lead byte.
fn utf8_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_integer_and_double() {
        let (tokens, error) = lex("1 2.5 3e2");
        assert!(error.is_none());
        assert_eq!(tokens[0].kind, Kind::Integer(1));
        assert_eq!(tokens[1].kind, Kind::Double(2.5));
        assert_eq!(tokens[2].kind, Kind::Double(300.0));
    }

    #[test]
    fn lexes_string_escapes() {
        let (tokens, error) = lex(r#""a\nb""#);
        assert!(error.is_none());
        assert_eq!(tokens[0].kind, Kind::String("a\nb".to_string()));
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let (tokens, _) = lex("1\n2\n3");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn reports_unterminated_string() {
        let (_, error) = lex("\"abc");
        assert!(error.is_some());
    }

    #[test]
    fn skips_comments() {
        let (tokens, error) = lex("1 # trailing comment\n2");
        assert!(error.is_none());
        assert_eq!(tokens[0].kind, Kind::Integer(1));
        assert_eq!(tokens[1].kind, Kind::Integer(2));
    }
}
