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

//! Every tunable of the frontend lives on one `Config`, resolved from CLI
//! flags layered over built-in defaults, and threaded explicitly through the
//! event loop rather than read from statics.

use std::path::PathBuf;

use clap::Parser;

/// Standard port for a deltadb catalog server; the TCP update port is always
/// `port + 1`.
const DEFAULT_PORT: u16 = 9097;

#[derive(Parser, Clone, Debug)]
#[command(name = "catalogd", about = "deltadb catalog frontend")]
pub struct Config {
    /// Network interface to bind to; all interfaces if unset.
    #[arg(short = 'I', long)]
    pub interface: Option<String>,

    /// Port to listen on for UDP/TCP updates and HTTP queries.
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Lifetime of a record, in seconds, before automatic expiry.
    #[arg(short = 'l', long, default_value_t = 1800)]
    pub lifetime: i64,

    /// How often to sweep for expired records, in seconds.
    #[arg(long, default_value_t = 60)]
    pub clean_interval: i64,

    /// Directory holding per-day logs and checkpoints.
    #[arg(short = 'H', long, default_value = "catalog.history")]
    pub history_dir: PathBuf,

    /// Maximum number of simultaneous query-handling threads.
    #[arg(short = 'm', long, default_value_t = 50)]
    pub child_procs_max: usize,

    /// Maximum time, in seconds, to allow a query thread to run.
    #[arg(short = 'T', long, default_value_t = 60)]
    pub child_procs_timeout: u64,

    /// Maximum time, in seconds, to allow a streaming query thread to run.
    #[arg(short = 'Q', long = "streaming-timeout", default_value_t = 3600)]
    pub streaming_procs_timeout: u64,

    /// Maximum believable `total`/`avail` on an incoming update; unlimited if unset.
    #[arg(short = 'M', long)]
    pub max_server_size: Option<i64>,

    /// Preferred hostname to report in HTML pages; the machine's own hostname if unset.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Upstream catalog hosts to periodically report this server's own presence to.
    #[arg(short = 'u', long = "update-host")]
    pub update_hosts: Vec<String>,

    /// Interval, in seconds, between self-reports to `update_hosts`.
    #[arg(short = 'U', long, default_value_t = 300)]
    pub outgoing_timeout: i64,

    /// Write new updates, verbatim, to this log file (first sighting of each key only).
    #[arg(short = 'L', long)]
    pub update_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: None,
            port: DEFAULT_PORT,
            lifetime: 1800,
            clean_interval: 60,
            history_dir: PathBuf::from("catalog.history"),
            child_procs_max: 50,
            child_procs_timeout: 60,
            streaming_procs_timeout: 3600,
            max_server_size: None,
            name: None,
            update_hosts: Vec::new(),
            outgoing_timeout: 300,
            update_log: None,
        }
    }
}

impl Config {
    /// The TCP port dedicated to bulk/oversized updates; always one past
    /// the shared UDP-update/HTTP-query port.
    #[must_use]
    pub fn update_port(&self) -> u16 {
        self.port + 1
    }
}
