// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

//! A query filtering on `type` and projecting `[name, avail]` should only
//! surface records whose filter expression evaluates to `true`, and never
//! ones the filter was applied to and rejected.

use deltadb_jx::{Jx, Op, Operator};
use deltadb_query::{DisplayMode, EventHandlers, Query};

fn record(kind: &str, avail: i64, name: &str) -> Jx {
    Jx::object([
        ("type".to_string(), Jx::String(kind.to_string())),
        ("avail".to_string(), Jx::Integer(avail)),
        ("name".to_string(), Jx::String(name.to_string())),
    ])
}

fn is_chirp_with_avail_at_least_100() -> Jx {
    let is_chirp = Operator::binary(Op::Eq, Jx::Symbol("type".into(), 1), Jx::String("chirp".into()), 1);
    let has_avail = Operator::binary(Op::Ge, Jx::Symbol("avail".into(), 1), Jx::Integer(100), 1);
    Jx::Operator(Operator::binary(Op::And, Jx::Operator(is_chirp), Jx::Operator(has_avail), 1))
}

#[test]
fn filter_drops_records_that_fail_the_predicate() {
    let mut out = Vec::new();
    let mut query = Query::new(&mut out, DisplayMode::Objects);

    query.set_filter(is_chirp_with_avail_at_least_100());
    query.create("k1", record("chirp", 100, "A"));
    query.create("k2", record("catalog", 5, "B"));
    query.create("k3", record("chirp", 200, "C"));

    assert_eq!(query.len(), 2);
    assert!(query.lookup("k1").is_some());
    assert!(query.lookup("k2").is_none());
    assert!(query.lookup("k3").is_some());
}
