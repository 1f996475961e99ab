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

//! One event-handler interface, implemented by [`crate::Query`] and reused
//! by both the live catalog frontend and the log-replay path, in place of
//! the two parallel handler shapes the original C split between
//! `deltadb.c` and `deltadb_stream.c`.

use deltadb_jx::Jx;

/// Reacts to one decoded log line at a time. Every method returns `true` to
/// keep processing the stream, or `false` to stop (mirroring the original's
/// stoptime-triggered early exit).
pub trait EventHandlers {
    /// A record was created (or replaces one filtered out earlier).
    fn create(&mut self, key: &str, value: Jx) -> bool;
    /// A record was deleted outright.
    fn delete(&mut self, key: &str) -> bool;
    /// A record's existing fields were merged with `update`.
    fn merge(&mut self, key: &str, update: Jx) -> bool;
    /// A single field on a record was set.
    fn update(&mut self, key: &str, name: &str, value: Jx) -> bool;
    /// A single field on a record was removed.
    fn remove(&mut self, key: &str, name: &str) -> bool;
    /// The stream's logical clock advanced to `current`.
    fn time(&mut self, start: i64, stop: i64, current: i64) -> bool;
}
