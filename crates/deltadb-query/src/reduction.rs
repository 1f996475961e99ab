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

//! Reductions fold the values of an expression, evaluated against every
//! record that passes the `where` clause, into a single running value per
//! scope: one value for the whole table (`Global`), one per tick
//! (`Spatial`, reset every display interval), or one per record key
//! (`Temporal`, reset only at global/temporal resets).

use std::collections::HashMap;
use std::collections::HashSet;

use deltadb_jx::{print, Jx};

/// The kind of fold applied to the values an expression produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReductionKind {
    Count,
    Sum,
    First,
    Last,
    Min,
    Avg,
    Max,
    Inc,
    Unique,
}

impl ReductionKind {
    /// Parses a reduction name as used in query configuration (`COUNT`,
    /// `SUM`, ...). Returns `None` for anything else.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "COUNT" => Some(Self::Count),
            "SUM" => Some(Self::Sum),
            "FIRST" => Some(Self::First),
            "LAST" => Some(Self::Last),
            "MIN" => Some(Self::Min),
            "AVERAGE" | "AVG" => Some(Self::Avg),
            "MAX" => Some(Self::Max),
            "INC" => Some(Self::Inc),
            "UNIQUE" => Some(Self::Unique),
            _ => None,
        }
    }
}

/// The scope a reduction accumulates over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Reset every display tick; one value across all matching records.
    Spatial,
    /// One running value per record key, reset only by a temporal/global
    /// reset.
    Temporal,
    /// Never reset by a tick; accumulates for the life of the query.
    Global,
}

#[derive(Clone, Debug, Default)]
struct Accumulator {
    count: f64,
    sum: f64,
    first: f64,
    last: f64,
    min: f64,
    max: f64,
    unique_seen: HashSet<String>,
    unique_values: Vec<Jx>,
}

impl Accumulator {
    fn update(&mut self, kind: ReductionKind, value: &Jx) {
        if kind == ReductionKind::Unique {
            let printed = print::to_string(value);
            if self.unique_seen.insert(printed) {
                self.unique_values.push(value.clone());
            }
            return;
        }

        let val = value.as_f64().unwrap_or(1.0);

        if self.count == 0.0 {
            self.min = val;
            self.max = val;
            self.first = val;
        } else {
            if val < self.min {
                self.min = val;
            }
            if val > self.max {
                self.max = val;
            }
        }

        self.sum += val;
        self.last = val;
        self.count += 1.0;
    }

    fn render(&self, kind: ReductionKind) -> String {
        if kind == ReductionKind::Unique {
            return print::to_string(&Jx::array(self.unique_values.clone()));
        }
        let value = match kind {
            ReductionKind::Count => self.count,
            ReductionKind::Sum => self.sum,
            ReductionKind::First => self.first,
            ReductionKind::Last => self.last,
            ReductionKind::Min => self.min,
            ReductionKind::Avg => {
                if self.count > 0.0 {
                    self.sum / self.count
                } else {
                    0.0
                }
            }
            ReductionKind::Max => self.max,
            ReductionKind::Inc => self.last - self.first,
            ReductionKind::Unique => unreachable!(),
        };
        format!("{value:.6}")
    }
}

/// A single configured reduction: what to compute (`kind`/`expr`), and at
/// what scope.
pub struct Reduction {
    kind: ReductionKind,
    expr: Jx,
    scope: Scope,
    global: Accumulator,
    temporal: HashMap<String, Accumulator>,
}

impl Reduction {
    #[must_use]
    pub fn new(kind: ReductionKind, expr: Jx, scope: Scope) -> Self {
        Self { kind, expr, scope, global: Accumulator::default(), temporal: HashMap::new() }
    }

    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[must_use]
    pub fn expr(&self) -> &Jx {
        &self.expr
    }

    /// Resets accumulated state if this reduction belongs to `scope`.
    pub fn reset(&mut self, scope: Scope) {
        if self.scope != scope {
            return;
        }
        self.global = Accumulator::default();
        self.temporal.clear();
    }

    /// Folds `value` (already evaluated against a record) into this
    /// reduction's running state, if it belongs to `scope`.
    pub fn update(&mut self, key: &str, value: &Jx, scope: Scope) {
        if self.scope != scope {
            return;
        }
        match self.scope {
            Scope::Temporal => self.temporal.entry(key.to_string()).or_default().update(self.kind, value),
            Scope::Spatial | Scope::Global => self.global.update(self.kind, value),
        }
    }

    /// Renders the current global/spatial value as a decimal string
    /// (or, for `UNIQUE`, a JX array literal).
    #[must_use]
    pub fn render(&self) -> String {
        self.global.render(self.kind)
    }

    /// Renders one `{key: value}` pair per key this temporal reduction has
    /// seen, as a single JX object literal.
    #[must_use]
    pub fn render_temporal(&self) -> String {
        let object = Jx::object(
            self.temporal
                .iter()
                .map(|(key, acc)| (key.clone(), Jx::String(acc.render(self.kind)))),
        );
        print::to_string(&object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_ignores_value_type() {
        let mut r = Reduction::new(ReductionKind::Count, Jx::Integer(1), Scope::Global);
        r.update("k", &Jx::String("x".into()), Scope::Global);
        r.update("k", &Jx::Integer(5), Scope::Global);
        assert_eq!(r.render(), "2.000000");
    }

    #[test]
    fn sum_and_average_track_numeric_values() {
        let mut r = Reduction::new(ReductionKind::Sum, Jx::Integer(1), Scope::Global);
        r.update("k", &Jx::Integer(2), Scope::Global);
        r.update("k", &Jx::Integer(3), Scope::Global);
        assert_eq!(r.render(), "5.000000");
    }

    #[test]
    fn unique_dedups_by_printed_form() {
        let mut r = Reduction::new(ReductionKind::Unique, Jx::Integer(1), Scope::Global);
        r.update("k", &Jx::String("a".into()), Scope::Global);
        r.update("k", &Jx::String("a".into()), Scope::Global);
        r.update("k", &Jx::String("b".into()), Scope::Global);
        assert_eq!(r.render(), "[\"a\",\"b\"]");
    }

    #[test]
    fn temporal_scope_tracks_one_accumulator_per_key() {
        let mut r = Reduction::new(ReductionKind::Sum, Jx::Integer(1), Scope::Temporal);
        r.update("host1", &Jx::Integer(1), Scope::Temporal);
        r.update("host2", &Jx::Integer(2), Scope::Temporal);
        let rendered = r.render_temporal();
        assert!(rendered.contains("host1"));
        assert!(rendered.contains("host2"));
    }

    #[test]
    fn reset_clears_only_matching_scope() {
        let mut r = Reduction::new(ReductionKind::Sum, Jx::Integer(1), Scope::Spatial);
        r.update("k", &Jx::Integer(4), Scope::Spatial);
        r.reset(Scope::Global);
        assert_eq!(r.render(), "4.000000");
        r.reset(Scope::Spatial);
        assert_eq!(r.render(), "0.000000");
    }
}
