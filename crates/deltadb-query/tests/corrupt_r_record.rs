// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

//! A log containing a single corrupted `R` record (missing its newline,
//! with the next command glued onto the field name) must recover the same
//! state as if the two commands had been logged separately.

use deltadb_jx::Jx;
use deltadb_query::{process, DisplayMode, EventHandlers, Query};

#[test]
fn corrupt_r_record_reconsiders_the_remainder_as_a_new_command() {
    let mut out = Vec::new();
    let mut query = Query::new(&mut out, DisplayMode::Objects);
    query.create("k", Jx::object([("a".to_string(), Jx::Integer(1)), ("field".to_string(), Jx::Integer(9))]));

    let log = "R k fieldC k {\"a\":1}\n";
    let kept_going = process(log, 0, i64::MAX, &mut query);
    assert!(kept_going);

    assert_eq!(query.len(), 1);
}
