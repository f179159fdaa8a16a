//! Run configuration: site profile and extractor settings.
//!
//! Selector strings and login signals are site-specific data, not code.
//! The defaults target the course platform this tool grew up on; point the
//! profile elsewhere for structurally similar sites.

use crate::login::LoginSignal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default report filename, written into the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "course_structure.txt";

/// Filename of the persisted session inside the data dir.
pub const SESSION_FILE: &str = "session.json";

/// CSS selectors and text patterns describing one site's layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Selector (comma alternatives allowed) matching one discipline card.
    pub discipline_card_selector: String,
    /// Link-selector alternatives tried inside each card, in order.
    pub discipline_link_selectors: Vec<String>,
    /// Selector matching lesson-title elements on a discipline page.
    pub lesson_title_selector: String,
    /// Selector for the package title on the package page.
    pub package_title_selector: String,
    /// Ordered post-login signals; the first positive one wins.
    pub login_signals: Vec<LoginSignal>,
    /// Visible-text alternatives identifying the "expand all content" control.
    pub expand_button_texts: Vec<String>,
    /// Keyword a candidate lesson title must contain, case-insensitively.
    pub lesson_keyword: String,
    /// Minimum trimmed character count of a lesson title.
    pub min_lesson_title_len: usize,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            discipline_card_selector:
                "div.course-item-wrapper, div[data-testid='course-card'], .v-card.course-card"
                    .to_string(),
            discipline_link_selectors: vec![
                "a.discipline-title-link".to_string(),
                "a:has(h4)".to_string(),
                ".course-name a".to_string(),
                "a".to_string(),
            ],
            lesson_title_selector:
                "li.lesson-item-wrapper h4, div.lesson-title, div.module-title-wrapper, .lesson-item-title"
                    .to_string(),
            package_title_selector: "h1".to_string(),
            login_signals: vec![
                LoginSignal::UrlContains("/app/dashboard".to_string()),
                LoginSignal::UrlContains("/dashboard".to_string()),
                LoginSignal::UrlContains("/app/".to_string()),
                LoginSignal::SelectorVisible("h1".to_string()),
                LoginSignal::SelectorVisible(".course-title".to_string()),
                LoginSignal::SelectorVisible(".course-header".to_string()),
                LoginSignal::SelectorVisible(".dashboard-title".to_string()),
                LoginSignal::SelectorVisible("nav[data-testid='main-nav']".to_string()),
                LoginSignal::SelectorVisible(".user-menu".to_string()),
                LoginSignal::SelectorVisible(".dashboard-content".to_string()),
            ],
            expand_button_texts: vec![
                "Expandir todos".to_string(),
                "Visualizar conteúdo completo".to_string(),
                "Ver tudo".to_string(),
                "Expandir".to_string(),
            ],
            lesson_keyword: "aula".to_string(),
            min_lesson_title_len: 5,
        }
    }
}

/// Timeouts, paths, and browser settings for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Where the session file and login diagnostics live.
    pub data_dir: PathBuf,
    /// Report path, overwritten wholesale on success.
    pub output_path: PathBuf,
    /// Run the browser headless. First-run manual login needs a window.
    pub headless: bool,
    /// Manual-login validation deadline.
    pub login_timeout: Duration,
    /// Poll interval of the login gate.
    pub login_poll_interval: Duration,
    /// Per-navigation deadline.
    pub nav_timeout: Duration,
    /// Deadline for the expand-all control to appear.
    pub expand_timeout: Duration,
    /// Settle delay after a successful expand click.
    pub settle_delay: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            headless: false,
            login_timeout: Duration::from_secs(300),
            login_poll_interval: Duration::from_secs(1),
            nav_timeout: Duration::from_secs(30),
            expand_timeout: Duration::from_secs(3),
            settle_delay: Duration::from_secs(1),
        }
    }
}

impl ExtractorConfig {
    /// Path of the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

/// Default data dir: `~/.syllabo`.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".syllabo")
}
