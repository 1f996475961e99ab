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

use std::fmt;

/// Longest UUID suffix carried into a key, matching the original catalog
/// server's `%.128s` truncation.
const MAX_UUID_LEN: usize = 128;

/// The `address:port:name[:uuid]` key that identifies a record in the table.
///
/// Two records with different addresses, ports, names, or UUIDs are always
/// distinct keys, so equality and hashing compare every component (which is
/// equivalent to comparing the canonical [`Display`] string, since the
/// components are exactly its decomposition).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId {
    address: String,
    port: u16,
    name: String,
    uuid: Option<String>,
}

/// A key string that does not match the `address:port:name[:uuid]` grammar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdError {
    #[error("empty record key")]
    Empty,
    #[error("missing address in record key {0:?}")]
    MissingAddress(String),
    #[error("missing or invalid port in record key {0:?}")]
    InvalidPort(String),
    #[error("missing name in record key {0:?}")]
    MissingName(String),
}

impl RecordId {
    /// Builds a key from its parts, truncating an overlong UUID the same
    /// way the original catalog server does.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16, name: impl Into<String>, uuid: Option<String>) -> Self {
        let uuid = uuid.map(|u| truncate(&u, MAX_UUID_LEN));
        Self { address: address.into(), port, name: name.into(), uuid }
    }

    /// Parses a key of the form `address:port:name` or `address:port:name:uuid`.
    pub fn parse(s: &str) -> Result<Self, RecordIdError> {
        if s.is_empty() {
            return Err(RecordIdError::Empty);
        }
        let mut parts = s.splitn(3, ':');
        let address = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| RecordIdError::MissingAddress(s.to_string()))?;
        let port_str = parts.next().ok_or_else(|| RecordIdError::InvalidPort(s.to_string()))?;
        let port: u16 = port_str.parse().map_err(|_| RecordIdError::InvalidPort(s.to_string()))?;
        let rest = parts.next().ok_or_else(|| RecordIdError::MissingName(s.to_string()))?;
        let (name, uuid) = match rest.split_once(':') {
            Some((name, uuid)) => (name, Some(uuid.to_string())),
            None => (rest, None),
        };
        if name.is_empty() {
            return Err(RecordIdError::MissingName(s.to_string()));
        }
        Ok(Self::new(address, port, name, uuid))
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.address, self.port, self.name)?;
        if let Some(uuid) = &self.uuid {
            write!(f, ":{uuid}")?;
        }
        Ok(())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((at, _)) => s[..at].to_string(),
        None => s.to_string(),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_without_uuid() {
        let id = RecordId::parse("10.0.0.1:9097:wq1").unwrap();
        assert_eq!(id.address(), "10.0.0.1");
        assert_eq!(id.port(), 9097);
        assert_eq!(id.name(), "wq1");
        assert_eq!(id.uuid(), None);
        assert_eq!(id.to_string(), "10.0.0.1:9097:wq1");
    }

    #[test]
    fn round_trips_with_uuid() {
        let id = RecordId::parse("10.0.0.1:9097:wq1:abc-123").unwrap();
        assert_eq!(id.uuid(), Some("abc-123"));
        assert_eq!(id.to_string(), "10.0.0.1:9097:wq1:abc-123");
    }

    #[test]
    fn truncates_overlong_uuid() {
        let long = "x".repeat(200);
        let id = RecordId::new("host", 1, "name", Some(long));
        assert_eq!(id.uuid().unwrap().len(), MAX_UUID_LEN);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(RecordId::parse(""), Err(RecordIdError::Empty)));
        assert!(matches!(RecordId::parse("host"), Err(RecordIdError::InvalidPort(_))));
        assert!(matches!(RecordId::parse("host:notaport:name"), Err(RecordIdError::InvalidPort(_))));
        assert!(matches!(RecordId::parse("host:80:"), Err(RecordIdError::MissingName(_))));
    }

    #[test]
    fn distinct_components_are_distinct_keys() {
        let a = RecordId::parse("h:1:n").unwrap();
        let b = RecordId::parse("h:1:n:u").unwrap();
        assert_ne!(a, b);
    }
}
