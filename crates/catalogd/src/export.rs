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

//! Renders records for the three snapshot query formats (`query.text`,
//! `query.json`, `query.html`) and the single-record detail page.

use deltadb_jx::{print, Jx};

/// Columns shown in the HTML table view, in display order.
pub const HTML_COLUMNS: &[(&str, &str)] = &[
    ("type", "TYPE"),
    ("name", "NAME"),
    ("port", "PORT"),
    ("owner", "OWNER"),
    ("total", "TOTAL"),
    ("avail", "AVAIL"),
    ("load5", "LOAD5"),
    ("version", "VERSION"),
];

/// One record as legacy `name = value` lines followed by a blank line, the
/// plain-text snapshot format.
pub fn nvpair(record: &Jx) -> String {
    let mut out = String::new();
    if let Some(object) = record.as_object() {
        for (key, value) in object.iter() {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(&nvpair_value(value));
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

fn nvpair_value(value: &Jx) -> String {
    match value {
        Jx::String(s) => s.clone(),
        other => print::to_string(other),
    }
}

/// The whole snapshot as a JSON array, one object per line.
pub fn json_array(records: &[&Jx]) -> String {
    let mut out = String::from("[\n");
    for (i, record) in records.iter().enumerate() {
        out.push_str(&print::to_string(record));
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("]\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn cell(record: &Jx, field: &str) -> String {
    match record.as_object().and_then(|object| object.get(field)) {
        Some(Jx::String(s)) => escape_html(s),
        Some(other) => escape_html(&print::to_string(other)),
        None => String::new(),
    }
}

/// Renders the sorted snapshot as an HTML table, each row linking to that
/// record's `/detail/<key>` page.
pub fn html_table(records: &[(&str, &Jx)]) -> String {
    let mut out = String::from("<table border=1>\n<tr>");
    for (_, label) in HTML_COLUMNS {
        out.push_str(&format!("<th>{label}</th>"));
    }
    out.push_str("</tr>\n");

    for (key, record) in records {
        out.push_str("<tr>");
        for (i, (field, _)) in HTML_COLUMNS.iter().enumerate() {
            let value = cell(record, field);
            if i == 0 {
                out.push_str(&format!("<td><a href=\"/detail/{key}\">{value}</a></td>"));
            } else {
                out.push_str(&format!("<td>{value}</td>"));
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Sums `total`/`avail` across the snapshot for the summary line above the table.
#[must_use]
pub fn totals(records: &[&Jx]) -> (i64, i64, usize) {
    let mut total = 0i64;
    let mut avail = 0i64;
    for record in records {
        if let Some(object) = record.as_object() {
            total += object.get("total").and_then(Jx::as_f64).unwrap_or(0.0) as i64;
            avail += object.get("avail").and_then(Jx::as_f64).unwrap_or(0.0) as i64;
        }
    }
    (total, avail, records.len())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nvpair_lines() {
        let record = Jx::object([("type".to_string(), Jx::String("chirp".to_string())), ("port".to_string(), Jx::Integer(9094))]);
        let text = nvpair(&record);
        assert!(text.contains("type = chirp\n"));
        assert!(text.contains("port = 9094\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn escapes_html_special_characters() {
        let record = Jx::object([("name".to_string(), Jx::String("<script>".to_string()))]);
        assert_eq!(cell(&record, "name"), "&lt;script&gt;");
    }

    #[test]
    fn sums_totals_across_records() {
        let a = Jx::object([("total".to_string(), Jx::Integer(100)), ("avail".to_string(), Jx::Integer(10))]);
        let b = Jx::object([("total".to_string(), Jx::Integer(200)), ("avail".to_string(), Jx::Integer(20))]);
        let (total, avail, count) = totals(&[&a, &b]);
        assert_eq!((total, avail, count), (300, 30, 2));
    }
}
