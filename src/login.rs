//! Post-login detection gate.
//!
//! A manual login is human-paced, so a fixed sleep-then-proceed wait is
//! unreliable. The gate instead polls the live page at a fixed interval and
//! evaluates a small ordered set of independent signals each tick. Two
//! signal families cover different post-login behaviors: sites that redirect
//! to an authenticated URL, and sites that swap page content in place.

use crate::driver::PageHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One post-login signal. The first positive signal ends the poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginSignal {
    /// The current page URL contains this fragment.
    UrlContains(String),
    /// This selector resolves to a visible element.
    SelectorVisible(String),
}

/// Poll `page` until a signal reports authenticated state or `timeout`
/// elapses.
///
/// Transient driver errors (page mid-navigation, detached elements) are
/// swallowed per-iteration; only the deadline ends the loop negatively.
pub async fn await_authenticated(
    page: &dyn PageHandle,
    signals: &[LoginSignal],
    timeout: Duration,
    poll_interval: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if check_signals(page, signals).await {
            return true;
        }
        if Instant::now() + poll_interval > deadline {
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Evaluate all signals once, in order.
async fn check_signals(page: &dyn PageHandle, signals: &[LoginSignal]) -> bool {
    for signal in signals {
        let hit = match signal {
            LoginSignal::UrlContains(fragment) => match page.current_url().await {
                Ok(url) => url.contains(fragment.as_str()),
                Err(e) => {
                    debug!("url check failed (ignored): {e}");
                    false
                }
            },
            LoginSignal::SelectorVisible(selector) => match page.is_visible(selector).await {
                Ok(visible) => visible,
                Err(e) => {
                    debug!("indicator {selector:?} check failed (ignored): {e}");
                    false
                }
            },
        };
        if hit {
            debug!("post-login signal observed: {signal:?}");
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, DriverResult, SessionState};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A page whose URL flips to the dashboard after a set number of polls.
    /// `auth_after` of `None` never authenticates.
    struct GatePage {
        polls: AtomicU32,
        auth_after: Option<u32>,
        visible_selector: Option<&'static str>,
        url_errors: bool,
    }

    impl GatePage {
        fn new(auth_after: Option<u32>) -> Self {
            Self {
                polls: AtomicU32::new(0),
                auth_after,
                visible_selector: None,
                url_errors: false,
            }
        }
    }

    #[async_trait]
    impl PageHandle for GatePage {
        async fn goto(&self, _url: &str, _timeout: Duration) -> DriverResult<()> {
            Ok(())
        }
        async fn current_url(&self) -> DriverResult<String> {
            if self.url_errors {
                return Err(DriverError::Page("mid-navigation".to_string()));
            }
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            match self.auth_after {
                Some(k) if n >= k => Ok("https://campus.example.com/app/dashboard".to_string()),
                _ => Ok("https://campus.example.com/login".to_string()),
            }
        }
        async fn html(&self) -> DriverResult<String> {
            Ok(String::new())
        }
        async fn is_visible(&self, selector: &str) -> DriverResult<bool> {
            Ok(self.visible_selector == Some(selector))
        }
        async fn click_by_text(
            &self,
            _patterns: &[String],
            _timeout: Duration,
        ) -> DriverResult<bool> {
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

    fn url_signals() -> Vec<LoginSignal> {
        vec![LoginSignal::UrlContains("/app/dashboard".to_string())]
    }

    #[tokio::test]
    async fn test_returns_true_as_soon_as_url_matches() {
        let page = GatePage::new(Some(2));
        let start = std::time::Instant::now();
        let ok = await_authenticated(
            &page,
            &url_signals(),
            Duration::from_secs(5),
            Duration::from_millis(10),
        )
        .await;
        assert!(ok);
        // Signal appeared on the third poll; nowhere near the 5s deadline.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_returns_false_after_deadline() {
        let page = GatePage::new(None);
        let ok = await_authenticated(
            &page,
            &url_signals(),
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_visible_selector_counts_as_authenticated() {
        let mut page = GatePage::new(None);
        page.visible_selector = Some(".user-menu");
        let signals = vec![
            LoginSignal::UrlContains("/app/dashboard".to_string()),
            LoginSignal::SelectorVisible(".user-menu".to_string()),
        ];
        let ok = await_authenticated(
            &page,
            &signals,
            Duration::from_millis(100),
            Duration::from_millis(10),
        )
        .await;
        assert!(ok);
    }

    #[tokio::test]
    async fn test_query_errors_do_not_abort_the_poll() {
        let mut page = GatePage::new(None);
        page.url_errors = true;
        let ok = await_authenticated(
            &page,
            &url_signals(),
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_zero_timeout_still_checks_once() {
        let page = GatePage::new(Some(0));
        let ok = await_authenticated(
            &page,
            &url_signals(),
            Duration::from_millis(0),
            Duration::from_millis(10),
        )
        .await;
        assert!(ok);
    }
}
