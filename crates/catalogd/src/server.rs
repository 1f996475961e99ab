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

//! The cooperative event loop: one tick drains pending UDP updates, accepts
//! at most one TCP update connection and one TCP query connection, reaps
//! finished query threads, and runs the periodic expiry/self-report
//! actions, before going back to a short wait. This plays the role of the
//! original's single-threaded `select`-based loop; since `fork(2)` has no
//! Rust equivalent, a query connection is instead handed a thread holding a
//! read-only snapshot of the table, bounded by the same concurrency cap and
//! alarm timeout the original applies to child processes.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream, UdpSocket};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use deltadb_core::Table;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::expiry::ExpiryClock;
use crate::http;
use crate::update::{self, NullResolver};

/// Maximum payload read from a TCP update connection, matching the
/// original's 1 MiB scratch buffer.
const TCP_UPDATE_MAX: usize = 1024 * 1024;

/// How long a single poll iteration waits before re-checking everything,
/// the Rust stand-in for the original's 5-second `select` timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct Server {
    config: Config,
    table: Table,
    udp: UdpSocket,
    update_listener: TcpListener,
    query_listener: TcpListener,
    clock: ExpiryClock,
    active_queries: Arc<AtomicUsize>,
    last_report: Instant,
}

impl Server {
    pub fn bind(config: Config) -> CatalogResult<Self> {
        let bind_addr = config.interface.clone().unwrap_or_else(|| "0.0.0.0".to_string());

        let table = Table::create(Some(config.history_dir.clone()))?;

        let udp = UdpSocket::bind((bind_addr.as_str(), config.port)).map_err(|e| CatalogError::Bind(format!("udp {bind_addr}:{}", config.port), e))?;
        udp.set_nonblocking(true)?;

        let query_listener = TcpListener::bind((bind_addr.as_str(), config.port)).map_err(|e| CatalogError::Bind(format!("tcp {bind_addr}:{}", config.port), e))?;
        query_listener.set_nonblocking(true)?;

        let update_port = config.update_port();
        let update_listener =
            TcpListener::bind((bind_addr.as_str(), update_port)).map_err(|e| CatalogError::Bind(format!("tcp {bind_addr}:{update_port}"), e))?;
        update_listener.set_nonblocking(true)?;

        let now = chrono::Utc::now().timestamp();
        Ok(Self {
            table,
            udp,
            update_listener,
            query_listener,
            clock: ExpiryClock::new(now),
            active_queries: Arc::new(AtomicUsize::new(0)),
            last_report: Instant::now(),
            config,
        })
    }

    /// Runs the event loop forever (or until `should_continue` returns
    /// `false`, which tests use to bound a run to a handful of ticks).
    pub fn run(&mut self, mut should_continue: impl FnMut() -> bool) {
        while should_continue() {
            self.tick();
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn tick(&mut self) {
        let now = chrono::Utc::now().timestamp();
        self.clock.sweep(&mut self.table, now, self.config.lifetime, self.config.clean_interval);

        if self.config.outgoing_timeout > 0 && self.last_report.elapsed().as_secs() as i64 >= self.config.outgoing_timeout {
            self.report_self();
            self.last_report = Instant::now();
        }

        self.drain_udp_updates(now);
        self.accept_tcp_update(now);

        if self.active_queries.load(Ordering::Relaxed) < self.config.child_procs_max {
            self.accept_tcp_query();
        }
    }

    fn drain_udp_updates(&mut self, now: i64) {
        let mut buf = [0u8; 65536];
        loop {
            match self.udp.recv_from(&mut buf) {
                Ok((n, from)) => self.ingest(&buf[..n], &from.ip().to_string(), now),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!(error = %e, "udp recv failed");
                    break;
                }
            }
        }
    }

    fn accept_tcp_update(&mut self, now: i64) {
        let Ok((mut stream, addr)) = self.update_listener.accept() else { return };
        stream.set_nonblocking(false).ok();
        stream.set_read_timeout(Some(Duration::from_secs(5))).ok();

        let mut buf = vec![0u8; TCP_UPDATE_MAX];
        let Ok(n) = stream.read(&mut buf) else { return };
        if n == 0 {
            return;
        }
        if n > 4 && &buf[..4] == b"GET " {
            debug!(%addr, "rejecting http request on the update port");
            return;
        }
        self.ingest(&buf[..n], &addr.ip().to_string(), now);
    }

    fn ingest(&mut self, raw: &[u8], address: &str, now: i64) {
        match update::normalize(raw, address, now, self.config.max_server_size, &NullResolver) {
            Ok(update) => {
                let is_new = self.table.lookup(&update.key).is_none();
                if is_new {
                    if let Some(log_path) = &self.config.update_log {
                        log_first_sighting(log_path, &update.record);
                    }
                }
                if let Err(e) = self.table.insert(&update.key, update.record) {
                    warn!(error = %e, "failed to insert update");
                } else {
                    debug!(key = %update.key, "accepted update");
                }
            }
            Err(reason) => debug!(?reason, %address, "dropped malformed update"),
        }
    }

    fn accept_tcp_query(&mut self) {
        let Ok((stream, addr)) = self.query_listener.accept() else { return };
        stream.set_nonblocking(false).ok();
        stream.set_read_timeout(Some(Duration::from_secs(self.config.child_procs_timeout))).ok();

        let records: Vec<(String, deltadb_jx::Jx)> = self.table.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        let snapshot = Arc::new(records);
        let history_dir = self.config.history_dir.clone();
        let active = Arc::clone(&self.active_queries);

        active.fetch_add(1, Ordering::Relaxed);
        thread::spawn(move || {
            if let Err(e) = serve_query(stream, &snapshot, &history_dir) {
                debug!(error = %e, %addr, "query connection ended with an error");
            }
            active.fetch_sub(1, Ordering::Relaxed);
        });
    }

    fn report_self(&self) {
        if self.config.update_hosts.is_empty() {
            return;
        }
        let payload = deltadb_jx::print::to_string(&deltadb_jx::Jx::object([
            ("type".to_string(), deltadb_jx::Jx::String("catalog".to_string())),
            ("port".to_string(), deltadb_jx::Jx::Integer(i64::from(self.config.port))),
        ]));
        for host in &self.config.update_hosts {
            if let Ok(socket) = UdpSocket::bind("0.0.0.0:0") {
                let _ = socket.send_to(payload.as_bytes(), host);
            }
        }
        info!(hosts = self.config.update_hosts.len(), "reported self to upstream catalogs");
    }
}

fn log_first_sighting(path: &PathBuf, record: &deltadb_jx::Jx) {
    use std::fs::OpenOptions;
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", deltadb_jx::print::to_string(record));
    }
}

/// Builds a transient, read-only [`Table`]-shaped view from a snapshot of
/// records and serves one query connection against it. The snapshot is
/// reference-counted so many concurrent queries share it without copying,
/// matching the "worker over a COW snapshot" replacement for fork-per-query.
fn serve_query(mut stream: TcpStream, snapshot: &Arc<Vec<(String, deltadb_jx::Jx)>>, history_dir: &PathBuf) -> CatalogResult<()> {
    stream.set_nonblocking(false)?;
    let mut reader = std::io::BufReader::new(stream.try_clone()?);
    let Some(request) = http::read_request(&mut reader) else { return Ok(()) };

    let mut table = Table::create(None)?;
    for (key, value) in snapshot.iter() {
        table.insert(key, value.clone())?;
    }

    http::handle(&mut stream, &request, &table, history_dir)?;
    stream.flush()?;
    Ok(())
}
