// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

//! An update accepted through the normalization pipeline must land in the
//! table under its hash key and be visible through the HTTP query surface
//! in every snapshot format.

use catalogd::http::{self, Request};
use catalogd::update::{self, NullResolver};
use deltadb_core::Table;

#[test]
fn a_normalized_update_is_queryable_in_every_format() {
    let mut table = Table::create(None).unwrap();

    let raw = br#"{"type":"chirp","port":9094,"total":100,"avail":40,"name":"cclab00"}"#;
    let update = update::normalize(raw, "10.0.0.1", 1_700_000_000, None, &NullResolver).unwrap();
    table.insert(&update.key, update.record).unwrap();

    let history_dir = tempfile::tempdir().unwrap();

    let mut text_out = Vec::new();
    http::handle(&mut text_out, &Request { path: "/query.text".to_string() }, &table, history_dir.path()).unwrap();
    let text = String::from_utf8(text_out).unwrap();
    assert!(text.contains("name = cclab00\n"));

    let mut json_out = Vec::new();
    http::handle(&mut json_out, &Request { path: "/query.json".to_string() }, &table, history_dir.path()).unwrap();
    let json = String::from_utf8(json_out).unwrap();
    assert!(json.contains("\"cclab00\""));

    let mut html_out = Vec::new();
    http::handle(&mut html_out, &Request { path: "/".to_string() }, &table, history_dir.path()).unwrap();
    let html = String::from_utf8(html_out).unwrap();
    assert!(html.contains("cclab00"));
    assert!(html.contains("40 available out of 100 on 1 devices"));

    let mut detail_out = Vec::new();
    let detail_path = format!("/detail/{}", update.key);
    http::handle(&mut detail_out, &Request { path: detail_path }, &table, history_dir.path()).unwrap();
    let detail = String::from_utf8(detail_out).unwrap();
    assert!(detail.contains("cclab00"));
}

#[test]
fn an_unknown_detail_key_renders_the_not_found_page() {
    let table = Table::create(None).unwrap();
    let history_dir = tempfile::tempdir().unwrap();

    let mut out = Vec::new();
    http::handle(&mut out, &Request { path: "/detail/missing".to_string() }, &table, history_dir.path()).unwrap();
    let body = String::from_utf8(out).unwrap();
    assert!(body.contains("Unknown Item!"));
}

#[test]
fn a_malformed_update_is_rejected_and_never_reaches_the_table() {
    let raw = br#"{"total": 1 + 1}"#;
    let rejected = update::normalize(raw, "10.0.0.1", 0, None, &NullResolver).unwrap_err();
    assert_eq!(rejected, update::Rejected::NonConstant);
}
