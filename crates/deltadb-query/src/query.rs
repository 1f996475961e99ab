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

//! `Query` holds one query's configuration and working table, and is the
//! [`EventHandlers`] implementation that both live and replayed streams
//! drive.

use std::collections::HashMap;
use std::io::Write as _;

use chrono::{DateTime, Utc};
use deltadb_jx::{eval, print, Jx};

use crate::error::QueryResult;
use crate::handlers::EventHandlers;
use crate::reduction::{Reduction, Scope};

/// How matching records are rendered on each display tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Echo the normalized event stream itself, deferring `T`/`t` markers
    /// until a data event follows.
    Stream,
    /// `<time>\t<expr1>\t<expr2>…` per matching record.
    Exprs,
    /// `[<time>,[obj, obj, …]]` for all matching records.
    Objects,
    /// One line of reduction values per tick.
    Reduce,
}

/// A configured query: filter/where/project/reduce over the record stream.
pub struct Query<W> {
    table: HashMap<String, Jx>,
    output: W,
    epoch_mode: bool,
    filter_expr: Option<Jx>,
    where_expr: Option<Jx>,
    output_exprs: Vec<Jx>,
    reductions: Vec<Reduction>,
    display_mode: DisplayMode,
    display_every: i64,
    display_next: i64,
    deferred_time: Option<i64>,
    last_output_time: Option<i64>,
}

fn boolean_expr(expr: Option<&Jx>, data: &Jx) -> bool {
    let Some(expr) = expr else { return true };
    matches!(eval::eval(expr, data), Jx::Boolean(true))
}

impl<W: std::io::Write> Query<W> {
    #[must_use]
    pub fn new(output: W, display_mode: DisplayMode) -> Self {
        Self {
            table: HashMap::new(),
            output,
            epoch_mode: false,
            filter_expr: None,
            where_expr: None,
            output_exprs: Vec::new(),
            reductions: Vec::new(),
            display_mode,
            display_every: 1,
            display_next: 0,
            deferred_time: None,
            last_output_time: None,
        }
    }

    pub fn set_epoch_mode(&mut self, epoch_mode: bool) {
        self.epoch_mode = epoch_mode;
    }

    pub fn set_filter(&mut self, expr: Jx) {
        self.filter_expr = Some(expr);
    }

    pub fn set_where(&mut self, expr: Jx) {
        self.where_expr = Some(expr);
    }

    pub fn set_interval(&mut self, interval: i64) {
        self.display_every = interval;
    }

    pub fn set_start(&mut self, start: i64) {
        self.display_next = start;
    }

    pub fn add_output(&mut self, expr: Jx) {
        self.output_exprs.push(expr);
    }

    pub fn add_reduction(&mut self, reduction: Reduction) {
        self.reductions.push(reduction);
    }

    /// Loads an already-parsed checkpoint object into the working table,
    /// skipping any record that fails the configured filter.
    pub fn load_checkpoint(&mut self, checkpoint: &Jx) {
        let Jx::Object(object) = checkpoint else { return };
        for (key, value) in object.iter() {
            if boolean_expr(self.filter_expr.as_ref(), value) {
                self.table.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Looks up a record currently held in the query's working table.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Jx> {
        self.table.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn update_reductions(&mut self, key: &str, object: &Jx, scope: Scope) {
        if !boolean_expr(self.where_expr.as_ref(), object) {
            return;
        }
        for r in &mut self.reductions {
            let value = eval::eval(r.expr(), object);
            if !value.is_error() {
                r.update(key, &value, scope);
            }
        }
    }

    fn reset_reductions(&mut self, scope: Scope) {
        for r in &mut self.reductions {
            r.reset(scope);
        }
    }

    fn write_time_prefix(&mut self, current: i64) -> QueryResult<()> {
        if self.epoch_mode {
            write!(self.output, "{current}\t").map_err(crate::error::QueryError::Write)
        } else {
            let when = DateTime::<Utc>::from_timestamp(current, 0).unwrap_or_else(Utc::now);
            write!(self.output, "{}\t", when.format("%F %T")).map_err(crate::error::QueryError::Write)
        }
    }

    fn display_output_exprs(&mut self, current: i64) -> QueryResult<()> {
        let keys: Vec<String> = self.table.keys().cloned().collect();
        for key in keys {
            let Some(object) = self.table.get(&key).cloned() else { continue };
            if !boolean_expr(self.where_expr.as_ref(), &object) {
                continue;
            }
            self.write_time_prefix(current)?;
            for expr in self.output_exprs.clone() {
                let value = eval::eval(&expr, &object);
                write!(self.output, "{}\t", print::to_string(&value)).map_err(crate::error::QueryError::Write)?;
            }
            writeln!(self.output).map_err(crate::error::QueryError::Write)?;
        }
        Ok(())
    }

    fn display_output_objects(&mut self, current: i64) -> QueryResult<()> {
        writeln!(self.output, "[ {current},\n[").map_err(crate::error::QueryError::Write)?;
        let mut first = true;
        let keys: Vec<String> = self.table.keys().cloned().collect();
        for key in keys {
            let Some(object) = self.table.get(&key).cloned() else { continue };
            if !boolean_expr(self.where_expr.as_ref(), &object) {
                continue;
            }
            if !first {
                writeln!(self.output, ",").map_err(crate::error::QueryError::Write)?;
            }
            first = false;
            write!(self.output, "{}", print::to_string(&object)).map_err(crate::error::QueryError::Write)?;
        }
        writeln!(self.output, "\n]\n]").map_err(crate::error::QueryError::Write)
    }

    fn display_reduce_exprs(&mut self, current: i64) -> QueryResult<()> {
        self.reset_reductions(Scope::Spatial);

        let keys: Vec<String> = self.table.keys().cloned().collect();
        for key in keys {
            if let Some(object) = self.table.get(&key).cloned() {
                self.update_reductions(&key, &object, Scope::Spatial);
            }
        }

        self.write_time_prefix(current)?;

        for r in &self.reductions {
            match r.scope() {
                Scope::Temporal => write!(self.output, "{} ", r.render_temporal()).map_err(crate::error::QueryError::Write)?,
                Scope::Spatial | Scope::Global => write!(self.output, "{} ", r.render()).map_err(crate::error::QueryError::Write)?,
            }
        }
        writeln!(self.output).map_err(crate::error::QueryError::Write)?;

        self.reset_reductions(Scope::Temporal);
        self.reset_reductions(Scope::Global);
        Ok(())
    }

    fn display_deferred_time(&mut self) -> QueryResult<()> {
        let Some(deferred) = self.deferred_time.take() else { return Ok(()) };
        match self.last_output_time {
            Some(last) => writeln!(self.output, "t {}", deferred - last),
            None => writeln!(self.output, "T {deferred}"),
        }
        .map_err(crate::error::QueryError::Write)?;
        self.last_output_time = Some(deferred);
        Ok(())
    }
}

impl<W: std::io::Write> EventHandlers for Query<W> {
    fn create(&mut self, key: &str, value: Jx) -> bool {
        if !boolean_expr(self.filter_expr.as_ref(), &value) {
            return true;
        }

        self.update_reductions(key, &value, Scope::Global);
        self.update_reductions(key, &value, Scope::Temporal);

        if self.display_mode == DisplayMode::Stream {
            let _ = self.display_deferred_time();
            let _ = writeln!(self.output, "C {key} {}", print::to_string(&value));
        }

        self.table.insert(key.to_string(), value);
        true
    }

    fn delete(&mut self, key: &str) -> bool {
        if self.table.remove(key).is_some() && self.display_mode == DisplayMode::Stream {
            let _ = self.display_deferred_time();
            let _ = writeln!(self.output, "D {key}");
        }
        true
    }

    fn merge(&mut self, key: &str, update: Jx) -> bool {
        let Some(Jx::Object(current)) = self.table.get(key) else { return true };
        let Jx::Object(update_object) = &update else { return true };

        if self.display_mode == DisplayMode::Stream {
            let _ = self.display_deferred_time();
            let _ = writeln!(self.output, "M {key} {}", print::to_string(&update));
        }

        let merged = current.merged_with(update_object);
        self.table.insert(key.to_string(), Jx::Object(merged));

        if let Some(object) = self.table.get(key).cloned() {
            self.update_reductions(key, &object, Scope::Global);
            self.update_reductions(key, &object, Scope::Temporal);
        }
        true
    }

    fn update(&mut self, key: &str, name: &str, value: Jx) -> bool {
        let Some(Jx::Object(object)) = self.table.get_mut(key) else { return true };
        object.remove(name);
        object.insert(name.to_string(), value.clone());

        if self.display_mode == DisplayMode::Stream {
            let _ = self.display_deferred_time();
            let _ = writeln!(self.output, "U {key} {name} {}", print::to_string(&value));
        }

        if let Some(object) = self.table.get(key).cloned() {
            self.update_reductions(key, &object, Scope::Temporal);
            self.update_reductions(key, &object, Scope::Global);
        }
        true
    }

    fn remove(&mut self, key: &str, name: &str) -> bool {
        let Some(Jx::Object(object)) = self.table.get_mut(key) else { return true };
        object.remove(name);

        if self.display_mode == DisplayMode::Stream {
            let _ = self.display_deferred_time();
            let _ = writeln!(self.output, "R {key} {name}");
        }
        true
    }

    fn time(&mut self, _start: i64, stop: i64, current: i64) -> bool {
        if current > stop {
            return false;
        }
        if current < self.display_next {
            return true;
        }
        self.display_next += self.display_every;

        match self.display_mode {
            DisplayMode::Stream => self.deferred_time = Some(current),
            DisplayMode::Exprs => {
                let _ = self.display_output_exprs(current);
            }
            DisplayMode::Objects => {
                let _ = self.display_output_objects(current);
            }
            DisplayMode::Reduce => {
                let _ = self.display_reduce_exprs(current);
            }
        }
        true
    }
}
