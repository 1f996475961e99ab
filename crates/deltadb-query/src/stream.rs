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

//! Decodes log lines (`C`/`D`/`M`/`U`/`R`/`T`/`t`) and dispatches them to an
//! [`EventHandlers`] implementation, either from a single stream or from a
//! directory of per-day logs bracketed by `[t0, t1]`.

use std::collections::VecDeque;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use deltadb_jx::parse::Parser;
use deltadb_jx::Jx;
use tracing::warn;

use crate::error::{QueryError, QueryResult};
use crate::handlers::EventHandlers;

/// Parses every line of `text` and dispatches it to `handlers`, stopping
/// early if a handler returns `false` or the logical clock passes `stop`.
pub fn process<H: EventHandlers>(text: &str, start: i64, stop: i64, handlers: &mut H) -> bool {
    let mut current: i64 = 0;
    let mut pending: VecDeque<String> = text.lines().map(str::to_string).collect();

    while let Some(line) = pending.pop_front() {
        if line.is_empty() {
            continue;
        }
        if !apply_line(&line, &mut current, start, stop, handlers, &mut pending) {
            return false;
        }
        if current > stop {
            return false;
        }
    }
    true
}

fn corrupt(line: &str) {
    warn!(%line, "corrupt data in query stream");
}

fn apply_line<H: EventHandlers>(
    line: &str,
    current: &mut i64,
    start: i64,
    stop: i64,
    handlers: &mut H,
    pending: &mut VecDeque<String>,
) -> bool {
    let Some(rest) = line.get(1..).map(str::trim_start) else { return true };

    match line.as_bytes()[0] {
        b'C' => {
            let Some((key, value)) = rest.split_once(' ') else {
                corrupt(line);
                return true;
            };
            match parse_value(value) {
                Some(jvalue) => handlers.create(key, jvalue),
                None => {
                    corrupt(line);
                    true
                }
            }
        }
        b'D' => {
            let key = rest.trim();
            if key.is_empty() {
                corrupt(line);
                true
            } else {
                handlers.delete(key)
            }
        }
        b'M' => {
            let Some((key, value)) = rest.split_once(' ') else {
                corrupt(line);
                return true;
            };
            match parse_value(value) {
                Some(jvalue) => handlers.merge(key, jvalue),
                None => {
                    corrupt(line);
                    true
                }
            }
        }
        b'U' => {
            let mut parts = rest.splitn(3, ' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(name), Some(value)) => match parse_value(value) {
                    Some(jvalue) => handlers.update(key, name, jvalue),
                    None => handlers.update(key, name, Jx::String(value.to_string())),
                },
                _ => {
                    corrupt(line);
                    true
                }
            }
        }
        b'R' => apply_remove(rest, handlers, pending),
        b'T' => match rest.trim().parse::<i64>() {
            Ok(at) => {
                *current = at;
                handlers.time(start, stop, *current)
            }
            Err(_) => {
                corrupt(line);
                true
            }
        },
        b't' => match rest.trim().parse::<i64>() {
            Ok(delta) => {
                *current += delta;
                handlers.time(start, stop, *current)
            }
            Err(_) => {
                corrupt(line);
                true
            }
        },
        _ => {
            corrupt(line);
            true
        }
    }
}

/// See `deltadb-core`'s replay module for the rationale behind the
/// trailing-letter corruption workaround this mirrors.
fn apply_remove<H: EventHandlers>(rest: &str, handlers: &mut H, pending: &mut VecDeque<String>) -> bool {
    let mut parts = rest.splitn(3, ' ');
    let (Some(key), Some(name)) = (parts.next(), parts.next()) else {
        corrupt(rest);
        return true;
    };
    let trailer = parts.next();

    match trailer {
        Some(extra) if !extra.is_empty() => {
            let last = name.chars().last();
            match last.filter(|c| "CDUMRTt".contains(*c)) {
                Some(marker) => {
                    let real_name = &name[..name.len() - marker.len_utf8()];
                    if !handlers.remove(key, real_name) {
                        return false;
                    }
                    let mut reconsidered = String::new();
                    reconsidered.push(marker);
                    reconsidered.push(' ');
                    reconsidered.push_str(extra);
                    pending.push_front(reconsidered);
                    true
                }
                None => {
                    corrupt(rest);
                    true
                }
            }
        }
        _ => handlers.remove(key, name),
    }
}

fn parse_value(text: &str) -> Option<Jx> {
    let mut parser = Parser::new(text);
    parser.parse_value()
}

/// A raw passthrough replay: tracks the logical clock just enough to honor
/// `stop`, and hands every line (unparsed) to `sink`. Used for streaming
/// passthrough when no projection beyond the filter is configured.
pub fn process_fast<F: FnMut(&str) -> bool>(text: &str, stop: i64, mut sink: F) {
    let mut current: i64 = 0;
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        match line.as_bytes()[0] {
            b'T' => {
                if let Ok(at) = line[1..].trim().parse::<i64>() {
                    current = at;
                    if stop != 0 && current > stop {
                        return;
                    }
                } else {
                    corrupt(line);
                    continue;
                }
            }
            b't' => {
                if let Ok(delta) = line[1..].trim().parse::<i64>() {
                    current += delta;
                    if stop != 0 && current > stop {
                        return;
                    }
                } else {
                    corrupt(line);
                    continue;
                }
            }
            _ => {}
        }
        if !sink(line) {
            break;
        }
    }
}

fn read_checkpoint(path: &Path) -> Option<Jx> {
    let contents = fs::read_to_string(path).ok()?;
    let mut parser = Parser::new(&contents);
    parser.parse_value()
}

fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Replays a directory of per-day logs bracketed by `[start, stop]`: loads
/// `start`'s day checkpoint (respecting the handlers' filter via
/// [`crate::Query::load_checkpoint`]) and then reads each day's log file in
/// order, stopping at the first time marker past `stop` or after five
/// consecutive missing log files.
pub fn process_dir<H, L>(
    root: &Path,
    start: i64,
    stop: i64,
    handlers: &mut H,
    mut load_checkpoint: L,
) -> QueryResult<()>
where
    H: EventHandlers,
    L: FnMut(&Jx),
{
    let when = DateTime::<Utc>::from_timestamp(start, 0).unwrap_or_else(Utc::now);
    let mut year = when.year();
    let mut day = when.ordinal0();

    let stop_when = DateTime::<Utc>::from_timestamp(stop, 0).unwrap_or_else(Utc::now);
    let stop_year = stop_when.year();
    let stop_day = stop_when.ordinal0();

    let ckpt_path = root.join(year.to_string()).join(format!("{day}.ckpt"));
    if let Some(checkpoint) = read_checkpoint(&ckpt_path) {
        load_checkpoint(&checkpoint);
    }

    let mut missing = 0;
    let mut first_file = true;

    loop {
        let log_path = root.join(year.to_string()).join(format!("{day}.log"));
        match fs::File::open(&log_path) {
            Ok(mut file) => {
                missing = 0;
                let mut text = String::new();
                file.read_to_string(&mut text).map_err(|e| QueryError::Read(log_path.clone(), e))?;

                let effective_start = if first_file { start } else { 0 };
                first_file = false;

                let keep_going = process(&text, effective_start, stop, handlers);
                if !keep_going {
                    return Ok(());
                }
            }
            Err(_) => {
                missing += 1;
                if missing > 5 {
                    return Err(QueryError::TooManyMissingLogs(root.to_path_buf()));
                }
            }
        }

        day += 1;
        if day >= days_in_year(year) {
            year += 1;
            day = 0;
        }

        if year >= stop_year && day > stop_day {
            break;
        }
    }

    Ok(())
}
