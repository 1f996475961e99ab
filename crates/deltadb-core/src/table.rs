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

//! `Table` is the in-memory key→object map at the heart of the temporal
//! store. Live tables append every change to today's log; snapshot tables
//! are recovered as of a fixed point in time and reject writes.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use deltadb_jx::Jx;

use crate::error::{CoreError, CoreResult};
use crate::log::Log;
use crate::replay;

/// Field names whose changes carry no information worth logging: a
/// heartbeat's arrival time and a process's age change on every update.
const UNLOGGED_FIELDS: &[&str] = &["lastheardfrom", "uptime"];

/// The temporal key/value table.
pub struct Table {
    entries: HashMap<String, Jx>,
    log: Option<Log>,
    snapshot: bool,
}

impl Table {
    /// Opens a live table, recovering its state as of now and appending
    /// further changes to today's log. `logdir` is optional: without one,
    /// the table is a plain in-memory map with no durability.
    pub fn create(logdir: Option<PathBuf>) -> CoreResult<Self> {
        Self::create_instance(logdir, Utc::now(), false)
    }

    /// Opens a read-only table recovered as of `timestamp`. Mutating methods
    /// return [`CoreError::SnapshotReadOnly`].
    pub fn create_snapshot(logdir: PathBuf, timestamp: DateTime<Utc>) -> CoreResult<Self> {
        Self::create_instance(Some(logdir), timestamp, true)
    }

    fn create_instance(logdir: Option<PathBuf>, timestamp: DateTime<Utc>, snapshot: bool) -> CoreResult<Self> {
        let entries = match &logdir {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| CoreError::CreateLogDir(root.clone(), e))?;
                replay::recover(root, timestamp.timestamp())
            }
            None => HashMap::new(),
        };

        let log = match (logdir, snapshot) {
            (Some(root), false) => Some(Log::new(root)),
            _ => None,
        };

        Ok(Self { entries, log, snapshot })
    }

    fn require_writable(&self) -> CoreResult<()> {
        if self.snapshot {
            Err(CoreError::SnapshotReadOnly)
        } else {
            Ok(())
        }
    }

    /// Inserts `value` under `key`, logging either a creation event or, if a
    /// record already existed, the merge/remove events describing the
    /// difference between the old and new object.
    pub fn insert(&mut self, key: &str, value: Jx) -> CoreResult<()> {
        self.require_writable()?;

        let old = self.entries.remove(key);
        self.entries.insert(key.to_string(), value.clone());

        if let Some(log) = &mut self.log {
            match &old {
                Some(old_value) => log_updates(log, &self.entries, key, old_value, &value)?,
                None => log.create(&self.entries, key, &value)?,
            }
            log.flush()?;
        }

        Ok(())
    }

    /// Looks up the current value for `key`.
    pub fn lookup(&self, key: &str) -> Option<&Jx> {
        self.entries.get(key)
    }

    /// Removes and returns the record stored under `key`.
    pub fn remove(&mut self, key: &str) -> CoreResult<Option<Jx>> {
        self.require_writable()?;

        let removed = self.entries.remove(key);
        if removed.is_some() {
            if let Some(log) = &mut self.log {
                log.delete(&self.entries, key)?;
                log.flush()?;
            }
        }
        Ok(removed)
    }

    /// Iterates over every key currently in the table.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over every value currently in the table.
    pub fn values(&self) -> impl Iterator<Item = &Jx> {
        self.entries.values()
    }

    /// Iterates over every key/value pair currently in the table.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Jx)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of records currently in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether this table is a read-only snapshot.
    pub fn is_snapshot(&self) -> bool {
        self.snapshot
    }
}

/// Diffs `old` against `new` and logs the difference: a `remove-field` event
/// for every field present in `old` but absent from `new`, and a single
/// `merge` event carrying every field that is new or changed. Fields listed
/// in [`UNLOGGED_FIELDS`] never trigger either.
fn log_updates(log: &mut Log, entries: &HashMap<String, Jx>, key: &str, old: &Jx, new: &Jx) -> CoreResult<()> {
    let (Jx::Object(old), Jx::Object(new)) = (old, new) else {
        return log.create(entries, key, new);
    };

    let mut update = deltadb_jx::JxObject::new();

    for (name, old_value) in old.iter() {
        if UNLOGGED_FIELDS.contains(&name) {
            continue;
        }
        match new.get(name) {
            Some(new_value) if values_equal(old_value, new_value) => {}
            Some(new_value) => update.insert(name.to_string(), new_value.clone()),
            None => log.remove_field(entries, key, name)?,
        }
    }

    for (name, new_value) in new.iter() {
        if old.get(name).is_none() {
            update.insert(name.to_string(), new_value.clone());
        }
    }

    if !update.is_empty() {
        log.merge(entries, key, &Jx::Object(update))?;
    }

    Ok(())
}

fn values_equal(a: &Jx, b: &Jx) -> bool {
    deltadb_jx::print::to_string(a) == deltadb_jx::print::to_string(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_table_inserts_and_looks_up() {
        let mut table = Table::create(None).unwrap();
        table.insert("host1", Jx::object([("load".to_string(), Jx::Integer(3))])).unwrap();
        assert!(table.lookup("host1").is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn in_memory_table_removes() {
        let mut table = Table::create(None).unwrap();
        table.insert("host1", Jx::Integer(1)).unwrap();
        let removed = table.remove("host1").unwrap();
        assert!(removed.is_some());
        assert!(table.lookup("host1").is_none());
    }

    #[test]
    fn persistent_table_logs_create_then_merge() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("db");
        let mut table = Table::create(Some(root.clone())).unwrap();

        table
            .insert("host1", Jx::object([("load".to_string(), Jx::Integer(1))]))
            .unwrap();
        table
            .insert(
                "host1",
                Jx::object([("load".to_string(), Jx::Integer(2)), ("name".to_string(), Jx::String("a".into()))]),
            )
            .unwrap();

        let value = table.lookup("host1").unwrap();
        assert_eq!(value.lookup("load").unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn snapshot_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("db");
        {
            let mut table = Table::create(Some(root.clone())).unwrap();
            table.insert("host1", Jx::Integer(1)).unwrap();
        }

        let mut snapshot = Table::create_snapshot(root, Utc::now()).unwrap();
        assert!(snapshot.insert("host2", Jx::Integer(1)).is_err());
        assert!(snapshot.remove("host1").is_err());
    }

    #[test]
    fn reopening_a_live_table_recovers_prior_state() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("db");
        {
            let mut table = Table::create(Some(root.clone())).unwrap();
            table.insert("host1", Jx::object([("load".to_string(), Jx::Integer(1))])).unwrap();
        }

        let reopened = Table::create(Some(root)).unwrap();
        assert!(reopened.lookup("host1").is_some());
    }
}
