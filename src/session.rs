//! Persistent session store.
//!
//! One JSON file at a well-known path holds the serialized session state
//! for the target origin. The file is replaced wholesale on save and
//! deleted on login-validation failure; no locking, single run at a time.

use crate::driver::SessionState;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed store for the persisted login session.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the session file lives (whether or not it exists).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted state.
    ///
    /// Absence is a normal outcome meaning "first run, manual login
    /// required". An unreadable or undecodable file is treated the same
    /// way, with a warning, rather than failing the run before it starts.
    pub fn load(&self) -> Option<SessionState> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    "session file {} does not decode ({e}); falling back to manual login",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Persist `state`, replacing any previous file.
    pub fn save(&self, state: &SessionState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)
    }

    /// Delete the persisted state. Idempotent: a missing file is not an
    /// error.
    pub fn invalidate(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
