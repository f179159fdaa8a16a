//! Browser driver abstraction.
//!
//! Defines the `Driver` and `PageHandle` traits that abstract over the
//! browser engine (currently Chromium via chromiumoxide), so the extraction
//! pipeline can also run against scripted in-memory fakes in tests.

pub mod chromium;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Serialized authentication artifacts for one origin.
///
/// The cookie bundle is the CDP cookie array kept as opaque JSON; only the
/// driver that produced it interprets it again. localStorage entries ride
/// along because some platforms keep their tokens there instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Origin the state belongs to (`scheme://host[:port]`).
    pub origin: String,
    /// RFC 3339 capture time.
    pub saved_at: String,
    /// CDP cookie array, uninterpreted outside the driver.
    pub cookies: serde_json::Value,
    /// localStorage entries captured for the origin.
    #[serde(default)]
    pub local_storage: Vec<(String, String)>,
}

impl SessionState {
    /// Number of cookies in the bundle (0 when the bundle is not an array).
    pub fn cookie_count(&self) -> usize {
        self.cookies.as_array().map(|a| a.len()).unwrap_or(0)
    }
}

/// Errors surfaced by the browser driver.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("no Chromium/Chrome executable found (set SYLLABO_BROWSER or install Chrome)")]
    NoBrowser,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {ms}ms")]
    NavigationTimeout { url: String, ms: u64 },

    #[error("javascript evaluation failed: {0}")]
    Javascript(String),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("session state error: {0}")]
    Session(String),

    #[error("page operation failed: {0}")]
    Page(String),
}

impl DriverError {
    /// Short class name, embedded in error-marker report entries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch(_) => "Launch",
            Self::NoBrowser => "NoBrowser",
            Self::Navigation { .. } => "Navigation",
            Self::NavigationTimeout { .. } => "NavigationTimeout",
            Self::Javascript(_) => "Javascript",
            Self::Screenshot(_) => "Screenshot",
            Self::Session(_) => "Session",
            Self::Page(_) => "Page",
        }
    }
}

/// Convenience result type.
pub type DriverResult<T> = Result<T, DriverError>;

/// A browser engine that can open pages.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new page (tab).
    async fn new_page(&self) -> DriverResult<Box<dyn PageHandle>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> DriverResult<()>;
}

/// One live page.
///
/// Methods take `&self`; implementations carry their own synchronization.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to a URL and wait for the document to load, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> DriverResult<()>;
    /// Current page URL (empty string when the page has none yet).
    async fn current_url(&self) -> DriverResult<String>;
    /// Serialized live DOM markup.
    async fn html(&self) -> DriverResult<String>;
    /// Whether the first element matching `selector` exists with a non-empty
    /// bounding box.
    async fn is_visible(&self, selector: &str) -> DriverResult<bool>;
    /// Poll for a clickable control whose visible text contains any of
    /// `patterns` and click the first hit. Returns `Ok(false)` when none
    /// appeared within `timeout`.
    async fn click_by_text(&self, patterns: &[String], timeout: Duration) -> DriverResult<bool>;
    /// Write a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> DriverResult<()>;
    /// Apply persisted session state. May leave the page on the saved
    /// origin; callers navigate to their target afterwards.
    async fn restore_session(&self, state: &SessionState) -> DriverResult<()>;
    /// Capture the live session state for `origin`.
    async fn capture_session(&self, origin: &str) -> DriverResult<SessionState>;
    /// Close this page.
    async fn close(self: Box<Self>) -> DriverResult<()>;
}
