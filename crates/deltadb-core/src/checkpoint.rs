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

//! A checkpoint is the entire table state, written out verbatim as a single
//! JX object so the next day's recovery can skip straight to the last known
//! state instead of replaying from the beginning of time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use deltadb_jx::{parse::Parser, print, Jx};

use crate::error::{CoreError, CoreResult};

/// Writes the entire table state to `path` as one JX object, keyed by
/// record key.
pub(crate) fn write(path: &Path, entries: &HashMap<String, Jx>) -> CoreResult<()> {
    let object = Jx::object(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    let rendered = print::to_string_pretty(&object);
    fs::write(path, rendered).map_err(|e| CoreError::WriteCheckpoint(path.to_path_buf(), e))
}

/// Reads a checkpoint file into a fresh table, returning an empty table if
/// the file does not exist (a brand new log directory has no checkpoint).
/// Checkpoints that do not parse as a single JX object are assumed to
/// predate the JX-based format and are read as legacy nvpair records
/// instead, so that a pre-existing deployment upgrades in place.
pub(crate) fn read(path: &Path) -> HashMap<String, Jx> {
    let Ok(contents) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    let mut parser = Parser::new(&contents);
    match parser.parse_value() {
        Some(Jx::Object(object)) => object
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
        _ => read_legacy_nvpair(&contents),
    }
}

/// Parses the deprecated nvpair checkpoint format: `key = value` lines,
/// records separated by a blank line, keyed by the record's own `name`
/// field (records missing a name are dropped, as the original conversion
/// tool does).
fn read_legacy_nvpair(contents: &str) -> HashMap<String, Jx> {
    let mut entries = HashMap::new();
    let mut fields: Vec<(String, String)> = Vec::new();

    let mut flush = |fields: &mut Vec<(String, String)>, entries: &mut HashMap<String, Jx>| {
        if fields.is_empty() {
            return;
        }
        if let Some((_, name)) = fields.iter().find(|(key, _)| key == "name") {
            let object = Jx::object(
                fields
                    .drain(..)
                    .map(|(key, value)| (key, nvpair_value(&value))),
            );
            entries.insert(name.clone(), object);
        } else {
            fields.clear();
        }
    };

    for line in contents.lines() {
        if line.trim().is_empty() {
            flush(&mut fields, &mut entries);
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    flush(&mut fields, &mut entries);

    entries
}

fn nvpair_value(raw: &str) -> Jx {
    if let Ok(i) = raw.parse::<i64>() {
        Jx::Integer(i)
    } else if let Ok(d) = raw.parse::<f64>() {
        Jx::Double(d)
    } else {
        Jx::String(raw.to_string())
    }
}
