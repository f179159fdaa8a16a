// Copyright 2026 Syllabo Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fatal error taxonomy for an extraction run.
//!
//! Everything here aborts the whole run. Per-discipline scrape failures are
//! deliberately NOT represented: those are contained as
//! [`crate::lessons::ScrapeError`] and recorded in the report instead.

use crate::driver::DriverError;
use std::path::PathBuf;

/// An error that ends the run before a report is written.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The package URL failed up-front validation; no browser was opened.
    #[error("invalid package URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No post-login signal appeared before the deadline.
    #[error("login was not detected within {timeout_secs}s")]
    LoginTimeout { timeout_secs: u64 },

    /// The discipline-card query matched nothing on the package page.
    #[error("no discipline cards matched selector {selector:?}")]
    NoDisciplines { selector: String },

    /// Cards were found, but none yielded a usable (name, URL) pair.
    #[error("{cards} discipline card(s) found, but none had a usable title link")]
    NoUsableLinks { cards: usize },

    /// The freshly validated session could not be written to disk.
    #[error("could not persist session state to {}: {source}", path.display())]
    SessionPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Browser failure outside the contained per-discipline loop.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The report could not be written.
    #[error("could not write report to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Short class name for status lines and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "Validation",
            Self::LoginTimeout { .. } => "LoginTimeout",
            Self::NoDisciplines { .. } | Self::NoUsableLinks { .. } => "Discovery",
            Self::SessionPersist { .. } => "Session",
            Self::Driver(_) => "Driver",
            Self::Output { .. } => "Output",
        }
    }
}
