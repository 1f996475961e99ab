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

//! Reconstructing table state by loading a checkpoint and replaying the log
//! up to a target time.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, TimeZone, Utc};
use deltadb_jx::parse::Parser;
use deltadb_jx::Jx;
use tracing::debug;

use crate::checkpoint;

/// Loads the checkpoint for the UTC day containing `snapshot`, then replays
/// that day's log up to `snapshot`.
pub(crate) fn recover(root: &Path, snapshot: i64) -> HashMap<String, Jx> {
    let when = Utc.timestamp_opt(snapshot, 0).single().unwrap_or_else(Utc::now);
    let year = when.year();
    let yday = when.ordinal0();

    let ckpt_path = root.join(year.to_string()).join(format!("{yday}.ckpt"));
    let mut entries = checkpoint::read(&ckpt_path);

    let log_path = root.join(year.to_string()).join(format!("{yday}.log"));
    replay_file(&log_path, snapshot, &mut entries);
    entries
}

fn corrupt(path: &Path, line: &str) {
    debug!(log = %path.display(), %line, "corrupt data in log");
}

/// Replays a single log file into `entries`, stopping once a `T`/`t` time
/// marker advances past `snapshot`.
fn replay_file(path: &Path, snapshot: i64, entries: &mut HashMap<String, Jx>) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    let mut current: i64 = 0;
    let mut pending: VecDeque<String> = contents.lines().map(str::to_string).collect();

    while let Some(line) = pending.pop_front() {
        if line.is_empty() {
            continue;
        }
        match apply_line(path, &line, &mut current, snapshot, entries, &mut pending) {
            Flow::Continue => {}
            Flow::Stop => break,
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

fn apply_line(
    path: &Path,
    line: &str,
    current: &mut i64,
    snapshot: i64,
    entries: &mut HashMap<String, Jx>,
    pending: &mut VecDeque<String>,
) -> Flow {
    let Some(rest) = line.get(1..) else {
        return Flow::Continue;
    };
    let rest = rest.trim_start();

    match line.as_bytes()[0] {
        b'C' => {
            let Some((key, value)) = rest.split_once(' ') else {
                corrupt(path, line);
                return Flow::Continue;
            };
            match parse_value(value) {
                Some(jvalue) => {
                    entries.insert(key.to_string(), jvalue);
                }
                None => corrupt(path, line),
            }
        }
        b'M' => {
            let Some((key, value)) = rest.split_once(' ') else {
                corrupt(path, line);
                return Flow::Continue;
            };
            match parse_value(value) {
                Some(update) => {
                    let current_value = entries.remove(key);
                    let merged = match (current_value, update) {
                        (Some(Jx::Object(old)), Jx::Object(new)) => Jx::Object(old.merged_with(&new)),
                        (_, update) => update,
                    };
                    entries.insert(key.to_string(), merged);
                }
                None => corrupt(path, line),
            }
        }
        b'D' => {
            let key = rest.trim();
            if key.is_empty() {
                corrupt(path, line);
            } else {
                entries.remove(key);
            }
        }
        b'U' => {
            let mut parts = rest.splitn(3, ' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(name), Some(value)) => {
                    if let Some(Jx::Object(object)) = entries.get_mut(key) {
                        let jvalue = parse_value(value).unwrap_or_else(|| Jx::String(value.to_string()));
                        object.insert(name.to_string(), jvalue);
                    } else {
                        corrupt(path, line);
                    }
                }
                _ => corrupt(path, line),
            }
        }
        b'R' => {
            return apply_remove_field(path, rest, entries, pending);
        }
        b'T' => match rest.trim().parse::<i64>() {
            Ok(at) => {
                *current = at;
                if *current > snapshot {
                    return Flow::Stop;
                }
            }
            Err(_) => corrupt(path, line),
        },
        b't' => match rest.trim().parse::<i64>() {
            Ok(delta) => {
                *current += delta;
                if *current > snapshot {
                    return Flow::Stop;
                }
            }
            Err(_) => corrupt(path, line),
        },
        _ => corrupt(path, line),
    }
    Flow::Continue
}

/// A plain `R key name` removes one field. A corrupted line carries a third,
/// trailing token glued onto the field name; when the final character of
/// that token is a valid record-type letter, it is the start of the next
/// command, so the field name is trimmed and the remainder is reconsidered
/// as a fresh line rather than discarded.
fn apply_remove_field(
    path: &Path,
    rest: &str,
    entries: &mut HashMap<String, Jx>,
    pending: &mut VecDeque<String>,
) -> Flow {
    let mut parts = rest.splitn(3, ' ');
    let (Some(key), Some(name)) = (parts.next(), parts.next()) else {
        corrupt(path, rest);
        return Flow::Continue;
    };
    let trailer = parts.next();

    let field = match trailer {
        Some(extra) if !extra.is_empty() => {
            let last = name.chars().last();
            match last.filter(|c| "CDUMRTt".contains(*c)) {
                Some(marker) => {
                    let real_name = &name[..name.len() - marker.len_utf8()];
                    remove_field(entries, key, real_name);
                    let mut reconsidered = String::new();
                    reconsidered.push(marker);
                    reconsidered.push(' ');
                    reconsidered.push_str(extra);
                    pending.push_front(reconsidered);
                    return Flow::Continue;
                }
                None => {
                    corrupt(path, rest);
                    return Flow::Continue;
                }
            }
        }
        _ => name,
    };

    remove_field(entries, key, field);
    Flow::Continue
}

fn remove_field(entries: &mut HashMap<String, Jx>, key: &str, name: &str) {
    if let Some(Jx::Object(object)) = entries.get_mut(key) {
        object.remove(name);
    }
}

fn parse_value(text: &str) -> Option<Jx> {
    let mut parser = Parser::new(text);
    parser.parse_value()
}

#[allow(dead_code)]
pub(crate) fn checkpoint_and_log_paths(root: &Path, year: i32, yday: u32) -> (PathBuf, PathBuf) {
    (
        root.join(year.to_string()).join(format!("{yday}.ckpt")),
        root.join(year.to_string()).join(format!("{yday}.log")),
    )
}
