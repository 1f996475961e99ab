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

//! The append-only event log: one file per UTC day, holding `C`/`M`/`U`/`R`/
//! `D`/`T`/`t` lines. A new day rolls the log file over and drops an
//! intermediate checkpoint so the previous day never needs replaying again.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Utc};
use deltadb_jx::Jx;

use crate::checkpoint;
use crate::error::{CoreError, CoreResult};

/// Writer for the per-day event log.
pub(crate) struct Log {
    root: PathBuf,
    file: Option<File>,
    year: i32,
    /// Zero-based day of year, matching `struct tm`'s `tm_yday`.
    yday: u32,
    last_log_time: Option<i64>,
}

impl Log {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root, file: None, year: 0, yday: 0, last_log_time: None }
    }

    fn log_path(&self, year: i32, yday: u32) -> PathBuf {
        self.root.join(year.to_string()).join(format!("{yday}.log"))
    }

    fn checkpoint_path(&self, year: i32, yday: u32) -> PathBuf {
        self.root.join(year.to_string()).join(format!("{yday}.ckpt"))
    }

    /// Ensures the log file for the current UTC day is open, rolling over
    /// (and checkpointing the prior day) if the day has changed since the
    /// last write.
    fn select(&mut self, now: DateTime<Utc>, entries: &HashMap<String, Jx>) -> CoreResult<()> {
        let year = now.year();
        let yday = now.ordinal0();

        if self.file.is_some() && year == self.year && yday == self.yday {
            return Ok(());
        }

        let rolled_over = self.file.is_some();
        let previous = (self.year, self.yday);
        self.file = None;

        self.year = year;
        self.yday = yday;

        let dir = self.root.join(year.to_string());
        fs::create_dir_all(&dir).map_err(|e| CoreError::CreateLogDir(dir.clone(), e))?;

        let path = self.log_path(year, yday);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| CoreError::OpenLog(path.clone(), e))?;
        self.file = Some(file);

        if rolled_over {
            let ckpt = self.checkpoint_path(previous.0, previous.1);
            checkpoint::write(&ckpt, entries)?;
        }

        self.last_log_time = None;
        Ok(())
    }

    /// Emits a `T`/`t` time marker if the wall clock has advanced since the
    /// last line written.
    fn log_time(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        let current = now.timestamp();
        match self.last_log_time {
            None => {
                self.write_line(&format!("T {current}\n"))?;
                self.last_log_time = Some(current);
            }
            Some(last) if last != current => {
                self.write_line(&format!("t {}\n", current - last))?;
                self.last_log_time = Some(current);
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> CoreResult<()> {
        let path = self.log_path(self.year, self.yday);
        let file = self.file.as_mut().expect("select() opens the log file before any write");
        file.write_all(line.as_bytes()).map_err(|e| CoreError::WriteLog(path, e))
    }

    /// Selects the current day's log, stamps the time, and writes a single
    /// event line.
    fn message(&mut self, entries: &HashMap<String, Jx>, line: &str) -> CoreResult<()> {
        let now = Utc::now();
        self.select(now, entries)?;
        self.log_time(now)?;
        self.write_line(line)
    }

    pub(crate) fn create(&mut self, entries: &HashMap<String, Jx>, key: &str, value: &Jx) -> CoreResult<()> {
        self.message(entries, &format!("C {key} {}\n", deltadb_jx::print::to_string(value)))
    }

    pub(crate) fn merge(&mut self, entries: &HashMap<String, Jx>, key: &str, update: &Jx) -> CoreResult<()> {
        self.message(entries, &format!("M {key} {}\n", deltadb_jx::print::to_string(update)))
    }

    pub(crate) fn remove_field(&mut self, entries: &HashMap<String, Jx>, key: &str, name: &str) -> CoreResult<()> {
        self.message(entries, &format!("R {key} {name}\n"))
    }

    pub(crate) fn delete(&mut self, entries: &HashMap<String, Jx>, key: &str) -> CoreResult<()> {
        self.message(entries, &format!("D {key}\n"))
    }

    pub(crate) fn flush(&mut self) -> CoreResult<()> {
        if let Some(file) = &mut self.file {
            let path = self.log_path(self.year, self.yday);
            file.flush().map_err(|e| CoreError::WriteLog(path, e))?;
        }
        Ok(())
    }
}
