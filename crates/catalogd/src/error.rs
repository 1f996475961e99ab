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

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the catalog frontend.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures from the frontend binary: the one error type returned across the
/// update-ingestion and HTTP-query boundary, composed from every subsystem
/// crate via `#[from]`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Core(#[from] deltadb_core::CoreError),

    #[error(transparent)]
    Query(#[from] deltadb_query::QueryError),

    #[error(transparent)]
    RecordId(#[from] deltadb_id::RecordIdError),

    #[error("could not bind {0}: {1}")]
    Bind(String, #[source] std::io::Error),

    #[error("could not open history directory {0}")]
    History(PathBuf, #[source] std::io::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),
}
