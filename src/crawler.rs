//! Crawl orchestrator: drives one full extraction run.
//!
//! The run is a fixed sequence of phases over a single page:
//!
//! 1. **Session check**: restore a persisted session, or flag that a
//!    manual login is needed.
//! 2. **Manual login + validation**: human logs in, the login gate polls
//!    until an authenticated-area signal appears, session is persisted.
//! 3. **Discovery**: re-navigate to the package URL, read its title,
//!    extract the discipline links.
//! 4. **Scraping loop**: one sequential lesson scrape per discipline;
//!    per-discipline failures are folded in as error markers, never fatal.
//! 5. **Formatting**: render the structure and overwrite the report.
//!
//! The page is released on every exit path. No report is written unless
//! the run reaches the formatting phase.

use crate::config::{ExtractorConfig, SiteProfile};
use crate::diagnostics;
use crate::discover;
use crate::driver::{Driver, PageHandle};
use crate::errors::ExtractError;
use crate::lessons;
use crate::login;
use crate::outline::{CourseStructure, DisciplineResult, RunSummary};
use crate::report;
use crate::session::SessionStore;
use crate::status::{StatusFeed, StatusSender};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Orchestrates one extraction run against a package URL.
pub struct Crawler {
    config: ExtractorConfig,
    profile: SiteProfile,
    store: SessionStore,
    status: StatusFeed,
}

impl Crawler {
    pub fn new(config: ExtractorConfig, profile: SiteProfile) -> Self {
        let store = SessionStore::new(config.session_path());
        Self {
            config,
            profile,
            store,
            status: StatusFeed::new(None),
        }
    }

    /// Attach a status channel for user-facing progress updates.
    pub fn with_status(mut self, tx: StatusSender) -> Self {
        self.status = StatusFeed::new(Some(tx));
        self
    }

    /// Run the full extraction of `url` on a page opened from `driver`.
    pub async fn run(&self, driver: &dyn Driver, url: &str) -> Result<RunSummary, ExtractError> {
        let parsed = validate_url(url)?;
        let url = url.trim();
        let origin = parsed.origin().ascii_serialization();
        let start = Instant::now();

        self.status.info(format!("Starting extraction of: {url}"));
        let page = driver.new_page().await?;
        let result = self.run_on_page(page.as_ref(), url, &origin, start).await;
        if let Err(e) = page.close().await {
            debug!("page close failed: {e}");
        }

        match &result {
            Ok(summary) => self.status.success(format!(
                "Success! Course structure saved to: {}",
                summary.output_path.display()
            )),
            Err(e) => self
                .status
                .error(format!("Extraction failed: {}: {e}", e.kind())),
        }
        result
    }

    async fn run_on_page(
        &self,
        page: &dyn PageHandle,
        url: &str,
        origin: &str,
        start: Instant,
    ) -> Result<RunSummary, ExtractError> {
        // ── Session check ──

        let restored = match self.store.load() {
            Some(state) => {
                page.restore_session(&state).await?;
                self.status.success(format!(
                    "Session restored from {}. Skipping manual login.",
                    self.store.path().display()
                ));
                true
            }
            None => {
                self.status
                    .warn(format!("Opening browser for manual login at: {url}"));
                false
            }
        };

        page.goto(url, self.config.nav_timeout).await?;

        // ── Manual login + validation ──

        if !restored {
            if self.config.headless {
                self.status.warn(
                    "No saved session and the browser is headless; the login page \
                     will not be visible. Re-run without --headless.",
                );
            }
            self.status.warn(
                "Log in using the opened browser window. The run resumes \
                 automatically once login is detected.",
            );
            self.status.info(format!(
                "Validating login: waiting for an authenticated-area redirect \
                 or element (up to {}s)...",
                self.config.login_timeout.as_secs()
            ));

            let ok = login::await_authenticated(
                page,
                &self.profile.login_signals,
                self.config.login_timeout,
                self.config.login_poll_interval,
            )
            .await;
            if !ok {
                match diagnostics::capture(page, &self.config.data_dir).await {
                    Ok(snap) => self.status.warn(format!(
                        "Login diagnostics saved: {} and {}",
                        snap.screenshot.display(),
                        snap.markup.display()
                    )),
                    Err(e) => warn!("could not capture login diagnostics: {e:#}"),
                }
                if let Err(e) = self.store.invalidate() {
                    warn!("could not remove session file: {e}");
                }
                self.status.error(
                    "Login was not detected before the deadline. Make sure you \
                     completed the login in the opened window.",
                );
                return Err(ExtractError::LoginTimeout {
                    timeout_secs: self.config.login_timeout.as_secs(),
                });
            }

            let state = page.capture_session(origin).await?;
            self.store.save(&state).map_err(|source| {
                // A half-written session file must not survive into the next run.
                let _ = self.store.invalidate();
                ExtractError::SessionPersist {
                    path: self.store.path().to_path_buf(),
                    source,
                }
            })?;
            self.status.success(format!(
                "Session saved to {}. Future runs skip manual login.",
                self.store.path().display()
            ));
        }

        // ── Discovery ──

        // Re-navigate so the page state is correct after login or session
        // reuse, whichever path ran.
        page.goto(url, self.config.nav_timeout).await?;
        let html = page.html().await?;

        let title = discover::package_title(&html, &self.profile)
            .unwrap_or_else(|| discover::synthetic_title(url));
        self.status.info("Locating disciplines...");
        let refs = discover::discover(&html, url, &self.profile)?;
        self.status.info(format!("Found {} disciplines.", refs.len()));

        // ── Scraping loop ──

        let total = refs.len();
        let mut structure = CourseStructure::new(title);
        let mut failed = 0usize;
        for (i, discipline) in refs.iter().enumerate() {
            self.status.info(format!(
                "[{}/{}] Extracting lessons from: {}...",
                i + 1,
                total,
                discipline.name
            ));
            match lessons::scrape_lessons(page, &discipline.url, &self.profile, &self.config).await
            {
                Ok(found) => {
                    info!("{}: {} lessons extracted", discipline.name, found.len());
                    structure.push(DisciplineResult {
                        name: discipline.name.clone(),
                        lessons: found,
                    });
                }
                Err(e) => {
                    failed += 1;
                    warn!("{e}");
                    self.status.warn(format!(
                        "Could not extract lessons from {}; recorded an error marker.",
                        discipline.name
                    ));
                    structure.push(DisciplineResult {
                        name: discipline.name.clone(),
                        lessons: vec![e.marker()],
                    });
                }
            }
        }
        self.status.info(format!(
            "{total}/{total} disciplines processed ({failed} with errors)."
        ));

        // ── Formatting ──

        let lines = report::render(&structure);
        report::write_output(&self.config.output_path, &lines)?;

        Ok(RunSummary {
            package_title: structure.package_title,
            disciplines_total: total,
            disciplines_failed: failed,
            output_path: self.config.output_path.clone(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Up-front input check: non-empty, HTTP scheme, parsable absolute URL.
/// Fails before any browser resource is touched.
fn validate_url(url: &str) -> Result<Url, ExtractError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: "URL is empty".to_string(),
        });
    }
    if !trimmed.starts_with("http") {
        return Err(ExtractError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "URL must start with http:// or https://".to_string(),
        });
    }
    Url::parse(trimmed).map_err(|e| ExtractError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_package_urls() {
        let parsed =
            validate_url("https://campus.example.com/app/dashboard/pacote/355801").unwrap();
        assert_eq!(
            parsed.origin().ascii_serialization(),
            "https://campus.example.com"
        );
    }

    #[test]
    fn test_validate_url_rejects_empty_and_non_http() {
        assert!(matches!(
            validate_url("   "),
            Err(ExtractError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("ftp://campus.example.com/x"),
            Err(ExtractError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_url_trims_surrounding_whitespace() {
        let parsed = validate_url("  https://campus.example.com/p/1  ").unwrap();
        assert_eq!(parsed.path(), "/p/1");
    }
}
