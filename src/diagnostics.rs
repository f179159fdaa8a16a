//! Login-failure diagnostics.
//!
//! When login validation times out, the orchestrator captures what the page
//! actually looked like: a full-page screenshot plus the serialized markup,
//! written under the data dir with Unix-timestamp names so repeated
//! failures never collide.

use crate::driver::PageHandle;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Paths of one captured snapshot pair.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub screenshot: PathBuf,
    pub markup: PathBuf,
}

/// Capture a diagnostic snapshot of `page` into `dir`.
pub async fn capture(page: &dyn PageHandle, dir: &Path) -> Result<Snapshot> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create diagnostics dir {}", dir.display()))?;

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let screenshot = dir.join(format!("login_timeout_{ts}.png"));
    let markup = dir.join(format!("login_timeout_{ts}.html"));

    page.screenshot(&screenshot).await?;
    let html = page.html().await?;
    std::fs::write(&markup, html)
        .with_context(|| format!("cannot write markup dump {}", markup.display()))?;

    Ok(Snapshot { screenshot, markup })
}
