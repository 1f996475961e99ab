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

//! Periodic expiry sweep: records that have not reported in within their own
//! (capped) lifetime are dropped.

use deltadb_core::Table;
use tracing::info;

/// Tracks the clean-interval and startup-grace gating that
/// `remove_expired_records` applies before it will touch anything.
pub struct ExpiryClock {
    started_at: i64,
    last_clean: i64,
}

impl ExpiryClock {
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self { started_at: now, last_clean: 0 }
    }

    /// Removes every record whose own `lifetime` (capped by `max_lifetime`)
    /// has elapsed since `lastheardfrom`, but only once per `clean_interval`
    /// seconds, and never within `max_lifetime` seconds of startup (since a
    /// freshly restarted server has not heard from anyone yet).
    pub fn sweep(&mut self, table: &mut Table, now: i64, max_lifetime: i64, clean_interval: i64) {
        if now - self.last_clean < clean_interval {
            return;
        }
        if now - self.started_at < max_lifetime {
            return;
        }

        let expired: Vec<String> = table
            .iter()
            .filter_map(|(key, value)| {
                let object = value.as_object()?;
                let last_heard = object.get("lastheardfrom").and_then(deltadb_jx::Jx::as_f64).unwrap_or(0.0) as i64;
                let own_lifetime = object.get("lifetime").and_then(deltadb_jx::Jx::as_f64).map(|v| v as i64);
                let effective = match own_lifetime {
                    Some(lifetime) if lifetime > 0 => lifetime.min(max_lifetime),
                    _ => max_lifetime,
                };
                (now - last_heard > effective).then(|| key.to_string())
            })
            .collect();

        for key in &expired {
            let _ = table.remove(key);
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "expired stale catalog records");
        }

        self.last_clean = now;
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use deltadb_jx::Jx;

    fn record(last_heard: i64) -> Jx {
        Jx::object([("lastheardfrom".to_string(), Jx::Integer(last_heard))])
    }

    #[test]
    fn does_not_clean_within_the_startup_grace_period() {
        let mut table = Table::create(None).unwrap();
        table.insert("k", record(0)).unwrap();
        let mut clock = ExpiryClock::new(0);
        clock.sweep(&mut table, 100, 1800, 60);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removes_records_past_their_effective_lifetime() {
        let mut table = Table::create(None).unwrap();
        table.insert("stale", record(0)).unwrap();
        table.insert("fresh", record(1700)).unwrap();
        let mut clock = ExpiryClock::new(0);
        clock.sweep(&mut table, 1900, 1800, 60);
        assert_eq!(table.len(), 1);
        assert!(table.lookup("fresh").is_some());
    }

    #[test]
    fn only_sweeps_once_per_clean_interval() {
        let mut table = Table::create(None).unwrap();
        table.insert("stale", record(0)).unwrap();
        let mut clock = ExpiryClock::new(0);
        clock.sweep(&mut table, 1900, 1800, 60);
        table.insert("stale", record(0)).unwrap();
        clock.sweep(&mut table, 1910, 1800, 60);
        assert_eq!(table.len(), 1);
    }
}
