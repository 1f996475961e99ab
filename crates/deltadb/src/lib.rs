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

//! Facade over the temporal catalog store: the JX value and expression
//! language, the append-only log and in-memory table it backs, the
//! streaming query engine that replays that log, and the supporting record
//! ID and path/diagnostic utilities. Each concern lives in its own crate;
//! this one re-exports the surface an embedder needs without naming every
//! crate individually.

pub use deltadb_core::{CoreError, CoreResult, Table};
pub use deltadb_diagnostic::{location, report, Diagnostic, IntoDiagnostic, Location, Severity, Tag};
pub use deltadb_id::{RecordId, RecordIdError};
pub use deltadb_jx::{eval, function, parse, print, value, Jx, JxObject};
pub use deltadb_path::path;
pub use deltadb_query::{process, process_dir, process_fast, DisplayMode, EventHandlers, Query, QueryError, QueryResult, Reduction, ReductionKind, Scope};

/// Errors that can surface while embedding deltadb directly, without a
/// frontend of its own to translate them into HTTP responses or exit codes.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    RecordId(#[from] RecordIdError),
}

/// Result type for the facade's own combining operations.
pub type Result<T> = std::result::Result<T, Error>;
