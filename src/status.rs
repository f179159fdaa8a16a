// Copyright 2026 Syllabo Contributors
// SPDX-License-Identifier: Apache-2.0

//! Status update types and broadcast channel for run telemetry.
//!
//! The crawler emits `StatusUpdate`s as it moves through its phases, which
//! flow through a `tokio::sync::broadcast` channel to all subscribers
//! (currently the CLI front-end). When no subscriber exists, updates are
//! silently dropped.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// How a status update should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// Something degraded but the run continues.
    Warn,
    /// The run is about to fail.
    Error,
    /// A milestone completed.
    Success,
}

/// A single user-facing status update emitted during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Monotonically increasing sequence number within one run.
    pub seq: u64,
    /// Presentation severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Sender handle for emitting status updates.
///
/// Backed by a `tokio::sync::broadcast` channel so multiple listeners can
/// subscribe independently. When no listeners exist, `send()` returns an
/// error which we silently ignore.
pub type StatusSender = tokio::sync::broadcast::Sender<StatusUpdate>;

/// Receiver handle for consuming status updates.
pub type StatusReceiver = tokio::sync::broadcast::Receiver<StatusUpdate>;

/// Create a new status broadcast channel with a bounded buffer.
///
/// A buffer of 128 updates covers a typical run (a handful of phase
/// messages plus one line per discipline).
pub fn channel() -> (StatusSender, StatusReceiver) {
    tokio::sync::broadcast::channel(128)
}

/// Emitting side of the status channel, owned by the crawler.
///
/// Sequence numbers are assigned here so subscribers can detect gaps after
/// a `Lagged` receive. A feed built from `None` swallows everything.
pub struct StatusFeed {
    tx: Option<StatusSender>,
    seq: AtomicU64,
}

impl StatusFeed {
    pub fn new(tx: Option<StatusSender>) -> Self {
        Self {
            tx,
            seq: AtomicU64::new(0),
        }
    }

    /// Emit one update, silently ignoring send errors (no receivers).
    pub fn emit(&self, severity: Severity, message: impl Into<String>) {
        if let Some(ref sender) = self.tx {
            let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
            let _ = sender.send(StatusUpdate {
                seq,
                severity,
                message: message.into(),
            });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Severity::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(Severity::Success, message);
    }
}
