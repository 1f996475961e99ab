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

//! Turns one raw update payload (from UDP or TCP) into a normalized record
//! and its table key, in the six steps the catalog frontend has always
//! applied: decompress, parse, stamp, clamp, canonicalize, key.

use std::io::Read;

use deltadb_id::RecordId;
use deltadb_jx::parse::{ParseOptions, Parser};
use deltadb_jx::Jx;
use flate2::read::ZlibDecoder;

/// Largest payload accepted after decompression, matching the original's
/// fixed 1 MiB scratch buffer.
pub const MAX_UPDATE_SIZE: usize = 1024 * 1024;

/// Resolves an address to a hostname. Real reverse DNS needs a resolver
/// crate outside this workspace's dependency set; callers that don't have
/// one can use [`NullResolver`], which falls through to the producer's own
/// `name` field or the bare address, exactly as the original does when
/// `domain_name_cache_lookup_reverse` fails.
pub trait ReverseResolver {
    fn resolve(&self, address: &str) -> Option<String>;
}

/// A resolver that never resolves anything.
pub struct NullResolver;

impl ReverseResolver for NullResolver {
    fn resolve(&self, _address: &str) -> Option<String> {
        None
    }
}

/// Why an update was dropped. Every case is logged and ignored, never fatal.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejected {
    Decompress,
    Parse,
    NonConstant,
    Empty,
}

/// A normalized update, ready to be inserted into the table.
pub struct Update {
    pub key: String,
    pub record: Jx,
}

/// Runs the full six-step normalization pipeline over one raw payload.
pub fn normalize(
    raw: &[u8],
    address: &str,
    now: i64,
    max_server_size: Option<i64>,
    resolver: &dyn ReverseResolver,
) -> Result<Update, Rejected> {
    let decompressed;
    let data: &[u8] = if raw.first() == Some(&0x1A) {
        decompressed = inflate(&raw[1..]).ok_or(Rejected::Decompress)?;
        &decompressed
    } else {
        raw
    };

    if data.is_empty() {
        return Err(Rejected::Empty);
    }

    let text = String::from_utf8_lossy(data);
    let mut object = parse_record(&text)?;

    object.remove("address");
    object.insert("address".to_string(), Jx::String(address.to_string()));
    object.remove("lastheardfrom");
    object.insert("lastheardfrom".to_string(), Jx::Integer(now));

    if let Some(limit) = max_server_size.filter(|&limit| limit > 0) {
        clamp_field(&mut object, "total", limit);
        clamp_field(&mut object, "avail", limit);
    }

    canonicalize_name(&mut object, address, resolver);

    let record = Jx::Object(object);
    let key = make_hash_key(&record, address);
    Ok(Update { key, record })
}

fn inflate(compressed: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::new();
    let mut limited = (&mut decoder).take(MAX_UPDATE_SIZE as u64 + 1);
    limited.read_to_end(&mut out).ok()?;
    if out.len() > MAX_UPDATE_SIZE {
        return None;
    }
    Some(out)
}

/// Parses a `{`-prefixed payload as strict, constant JX, or else as a
/// legacy `name = value` nvpair record.
fn parse_record(text: &str) -> Result<deltadb_jx::JxObject, Rejected> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        let opts = ParseOptions { strict: true, static_mode: false };
        let mut parser = Parser::with_options(trimmed, opts);
        let value = parser.parse_value().ok_or(Rejected::Parse)?;
        if !is_constant(&value) {
            return Err(Rejected::NonConstant);
        }
        match value {
            Jx::Object(object) => Ok(object),
            _ => Err(Rejected::Parse),
        }
    } else {
        Ok(parse_nvpair_record(text))
    }
}

/// A value is "constant" when it contains no symbol or operator node,
/// matching `jx_is_constant`'s check that an update carries data, not an
/// unevaluated expression.
fn is_constant(value: &Jx) -> bool {
    match value {
        Jx::Symbol(..) | Jx::Operator(_) => false,
        Jx::Array(items) => items.iter().all(|item| item.comprehension.is_none() && is_constant(&item.value)),
        Jx::Object(object) => object.items().iter().all(|item| item.comprehension.is_none()) && object.iter().all(|(_, v)| is_constant(v)),
        Jx::Error(inner) => is_constant(inner),
        _ => true,
    }
}

/// Parses `name = value` lines (the legacy nvpair wire format) into a JX
/// object, guessing integer/double/string the same way the conversion tool
/// does.
fn parse_nvpair_record(text: &str) -> deltadb_jx::JxObject {
    let mut object = deltadb_jx::JxObject::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else { continue };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }
        let jvalue = if let Ok(i) = value.parse::<i64>() {
            Jx::Integer(i)
        } else if let Ok(d) = value.parse::<f64>() {
            Jx::Double(d)
        } else {
            Jx::String(value.to_string())
        };
        object.insert(key.to_string(), jvalue);
    }
    object
}

fn clamp_field(object: &mut deltadb_jx::JxObject, name: &str, limit: i64) {
    let over = matches!(object.get(name), Some(value) if value.as_f64().is_some_and(|v| v > limit as f64));
    if over {
        object.remove(name);
        object.insert(name.to_string(), Jx::Integer(limit));
    }
}

/// `JxObject::insert` already enforces one entry per key, so the original's
/// loop to remove duplicate `name` entries left over from a prior bug has
/// no counterpart here; a plain remove-then-insert suffices.
fn canonicalize_name(object: &mut deltadb_jx::JxObject, address: &str, resolver: &dyn ReverseResolver) {
    if let Some(resolved) = resolver.resolve(address) {
        object.remove("name");
        object.insert("name".to_string(), Jx::String(resolved));
    } else if object.get("name").is_none() {
        object.insert("name".to_string(), Jx::String(address.to_string()));
    }
}

fn make_hash_key(record: &Jx, address: &str) -> String {
    let Jx::Object(object) = record else { return address.to_string() };
    let addr = object.get("address").and_then(Jx::as_str).unwrap_or(address);
    let port = object.get("port").and_then(Jx::as_f64).map_or(0, |p| p as i64) as u16;
    let name = object.get("name").and_then(Jx::as_str).unwrap_or("unknown");
    let uuid = object.get("uuid").and_then(Jx::as_str).map(str::to_string);
    RecordId::new(addr, port, name, uuid).to_string()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_a_plain_jx_update() {
        let raw = br#"{"type":"chirp","port":9094,"total":100,"avail":50}"#;
        let update = normalize(raw, "10.0.0.1", 1000, None, &NullResolver).unwrap();
        assert_eq!(update.key, "10.0.0.1:9094:10.0.0.1");
        let Jx::Object(object) = &update.record else { panic!("expected object") };
        assert_eq!(object.get("lastheardfrom"), Some(&Jx::Integer(1000)));
        assert_eq!(object.get("address"), Some(&Jx::String("10.0.0.1".to_string())));
    }

    #[test]
    fn clamps_unbelievable_sizes() {
        let raw = br#"{"port":1,"total":999999999,"avail":999999999}"#;
        let update = normalize(raw, "10.0.0.1", 1000, Some(1000), &NullResolver).unwrap();
        let Jx::Object(object) = &update.record else { panic!("expected object") };
        assert_eq!(object.get("total"), Some(&Jx::Integer(1000)));
        assert_eq!(object.get("avail"), Some(&Jx::Integer(1000)));
    }

    #[test]
    fn parses_legacy_nvpair_updates() {
        let raw = b"type = chirp\nport = 9094\ntotal = 100\n";
        let update = normalize(raw, "10.0.0.1", 1000, None, &NullResolver).unwrap();
        let Jx::Object(object) = &update.record else { panic!("expected object") };
        assert_eq!(object.get("type"), Some(&Jx::String("chirp".to_string())));
        assert_eq!(object.get("total"), Some(&Jx::Integer(100)));
    }

    #[test]
    fn rejects_non_constant_payloads() {
        let raw = br#"{"total": 1+1}"#;
        assert_eq!(normalize(raw, "10.0.0.1", 1000, None, &NullResolver).unwrap_err(), Rejected::NonConstant);
    }

    #[test]
    fn uses_producer_name_when_resolver_finds_nothing() {
        let raw = br#"{"name":"wq1","port":1}"#;
        let update = normalize(raw, "10.0.0.1", 1000, None, &NullResolver).unwrap();
        let Jx::Object(object) = &update.record else { panic!("expected object") };
        assert_eq!(object.get("name"), Some(&Jx::String("wq1".to_string())));
    }
}
