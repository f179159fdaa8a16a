//! Per-discipline lesson extraction.

use crate::config::{ExtractorConfig, SiteProfile};
use crate::discover::element_text;
use crate::driver::{DriverError, PageHandle};
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// A contained per-discipline failure.
///
/// Never escalates past the orchestrator's scraping loop; it is folded
/// into the report as a single marker entry instead.
#[derive(thiserror::Error, Debug)]
#[error("could not scrape lessons from {url}: {source}")]
pub struct ScrapeError {
    pub url: String,
    #[source]
    pub source: DriverError,
}

impl ScrapeError {
    /// The synthetic lesson entry recorded for a failed discipline.
    pub fn marker(&self) -> String {
        format!("ERROR: could not extract lessons ({})", self.source.kind())
    }
}

/// Navigate to `url` and extract the filtered lesson titles.
///
/// The expand-all click is best-effort: some layouts only render lesson
/// titles after it, but its absence (or failure) is tolerated. Navigation
/// and markup failures come back as a [`ScrapeError`] for the caller to
/// fold; they never abort the batch.
pub async fn scrape_lessons(
    page: &dyn PageHandle,
    url: &str,
    profile: &SiteProfile,
    config: &ExtractorConfig,
) -> Result<Vec<String>, ScrapeError> {
    page.goto(url, config.nav_timeout)
        .await
        .map_err(|source| ScrapeError {
            url: url.to_string(),
            source,
        })?;

    match page
        .click_by_text(&profile.expand_button_texts, config.expand_timeout)
        .await
    {
        Ok(true) => {
            debug!("expanded collapsed content on {url}");
            tokio::time::sleep(config.settle_delay).await;
        }
        Ok(false) => debug!("no expand-all control on {url}"),
        Err(e) => debug!("expand-all click failed on {url} (ignored): {e}"),
    }

    let html = page.html().await.map_err(|source| ScrapeError {
        url: url.to_string(),
        source,
    })?;
    Ok(extract_lesson_titles(&html, profile))
}

/// Parse and filter lesson titles out of a discipline page's markup.
///
/// A candidate survives only if its trimmed length exceeds the profile
/// minimum and it contains the lesson keyword case-insensitively. Section
/// headers and decorative rows share the same markup as real titles, so
/// the filter is what keeps the report clean.
pub fn extract_lesson_titles(html: &str, profile: &SiteProfile) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = match Selector::parse(&profile.lesson_title_selector) {
        Ok(sel) => sel,
        Err(e) => {
            warn!(
                "lesson title selector {:?} does not parse: {e}",
                profile.lesson_title_selector
            );
            return Vec::new();
        }
    };
    let keyword = profile.lesson_keyword.to_lowercase();
    doc.select(&sel)
        .map(|el| element_text(&el))
        .filter(|title| {
            title.chars().count() > profile.min_lesson_title_len
                && title.to_lowercase().contains(&keyword)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverResult, SessionState};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const DISCIPLINE_HTML: &str = r#"
        <html><body>
          <div class="module-title-wrapper">Conteúdo do curso</div>
          <ul>
            <li class="lesson-item-wrapper"><h4>Aula 01 - Princípios Fundamentais</h4></li>
            <li class="lesson-item-wrapper"><h4>Aula</h4></li>
            <li class="lesson-item-wrapper"><h4>Material complementar em PDF</h4></li>
            <li class="lesson-item-wrapper"><h4>AULA 02 - Direitos e Garantias</h4></li>
          </ul>
          <div class="lesson-title">Aula 03 - Organização do Estado</div>
        </body></html>
    "#;

    struct DisciplinePage {
        html: &'static str,
        fail_navigation: bool,
        has_expand_button: bool,
        clicked: AtomicBool,
    }

    impl DisciplinePage {
        fn new(html: &'static str) -> Self {
            Self {
                html,
                fail_navigation: false,
                has_expand_button: false,
                clicked: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl PageHandle for DisciplinePage {
        async fn goto(&self, url: &str, timeout: Duration) -> DriverResult<()> {
            if self.fail_navigation {
                return Err(DriverError::NavigationTimeout {
                    url: url.to_string(),
                    ms: timeout.as_millis() as u64,
                });
            }
            Ok(())
        }
        async fn current_url(&self) -> DriverResult<String> {
            Ok(String::new())
        }
        async fn html(&self) -> DriverResult<String> {
            Ok(self.html.to_string())
        }
        async fn is_visible(&self, _selector: &str) -> DriverResult<bool> {
            Ok(false)
        }
        async fn click_by_text(
            &self,
            patterns: &[String],
            _timeout: Duration,
        ) -> DriverResult<bool> {
            if self.has_expand_button && patterns.iter().any(|p| p == "Expandir todos") {
                self.clicked.store(true, Ordering::SeqCst);
                return Ok(true);
            }
            Ok(false)
        }
        async fn screenshot(&self, _path: &Path) -> DriverResult<()> {
            Ok(())
        }
        async fn restore_session(&self, _state: &SessionState) -> DriverResult<()> {
            Ok(())
        }
        async fn capture_session(&self, origin: &str) -> DriverResult<SessionState> {
            Ok(SessionState {
                origin: origin.to_string(),
                saved_at: String::new(),
                cookies: serde_json::json!([]),
                local_storage: vec![],
            })
        }
        async fn close(self: Box<Self>) -> DriverResult<()> {
            Ok(())
        }
    }

    fn fast_config() -> ExtractorConfig {
        ExtractorConfig {
            settle_delay: Duration::from_millis(0),
            expand_timeout: Duration::from_millis(10),
            ..ExtractorConfig::default()
        }
    }

    #[test]
    fn test_filter_keeps_only_plausible_lesson_titles() {
        let titles = extract_lesson_titles(DISCIPLINE_HTML, &SiteProfile::default());
        assert_eq!(
            titles,
            vec![
                "Aula 01 - Princípios Fundamentais",
                "AULA 02 - Direitos e Garantias",
                "Aula 03 - Organização do Estado",
            ]
        );
    }

    #[test]
    fn test_filter_rejects_short_and_keywordless_text() {
        let titles = extract_lesson_titles(DISCIPLINE_HTML, &SiteProfile::default());
        // "Aula" is too short; "Material complementar em PDF" lacks the
        // keyword; "Conteúdo do curso" matched the selector but not the filter.
        assert!(!titles.iter().any(|t| t == "Aula"));
        assert!(!titles.iter().any(|t| t.contains("Material")));
        assert!(!titles.iter().any(|t| t.contains("Conteúdo")));
    }

    #[tokio::test]
    async fn test_scrape_clicks_expand_when_present() {
        let mut page = DisciplinePage::new(DISCIPLINE_HTML);
        page.has_expand_button = true;
        let titles = scrape_lessons(
            &page,
            "https://campus.example.com/curso/10",
            &SiteProfile::default(),
            &fast_config(),
        )
        .await
        .unwrap();
        assert!(page.clicked.load(Ordering::SeqCst));
        assert_eq!(titles.len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_tolerates_missing_expand_button() {
        let page = DisciplinePage::new(DISCIPLINE_HTML);
        let titles = scrape_lessons(
            &page,
            "https://campus.example.com/curso/10",
            &SiteProfile::default(),
            &fast_config(),
        )
        .await
        .unwrap();
        assert_eq!(titles.len(), 3);
    }

    #[tokio::test]
    async fn test_navigation_failure_becomes_scrape_error_with_marker() {
        let mut page = DisciplinePage::new(DISCIPLINE_HTML);
        page.fail_navigation = true;
        let err = scrape_lessons(
            &page,
            "https://campus.example.com/curso/10",
            &SiteProfile::default(),
            &fast_config(),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.marker(),
            "ERROR: could not extract lessons (NavigationTimeout)"
        );
    }
}
