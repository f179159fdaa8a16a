//! Chromium-based driver using chromiumoxide.

use super::{Driver, DriverError, DriverResult, PageHandle, SessionState};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use chrono::Utc;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Env var naming an explicit browser executable.
pub const BROWSER_ENV: &str = "SYLLABO_BROWSER";

/// Poll interval while waiting for a click target to appear.
const CLICK_POLL: Duration = Duration::from_millis(250);

/// Navigation bound for landing on the saved origin during restore.
const RESTORE_NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Find the Chromium/Chrome binary path.
pub fn find_browser() -> Option<PathBuf> {
    // 1. SYLLABO_BROWSER env
    if let Ok(p) = std::env::var(BROWSER_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based driver. One browser process; pages are tabs.
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
}

impl ChromiumDriver {
    /// Launch Chromium.
    ///
    /// Head-ful unless `headless`: the first-run manual login needs a
    /// window the user can type into.
    pub async fn launch(headless: bool) -> DriverResult<Self> {
        let chrome_path = find_browser().ok_or(DriverError::NoBrowser)?;
        info!(
            "launching {} (headless={headless})",
            chrome_path.display()
        );

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(1280, 900)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        builder = if headless {
            builder.arg("--headless=new").arg("--disable-gpu")
        } else {
            builder.with_head()
        };
        let config = builder
            .build()
            .map_err(|e| DriverError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
        })
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn new_page(&self) -> DriverResult<Box<dyn PageHandle>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Page(format!("failed to create new page: {e}")))?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn shutdown(&self) -> DriverResult<()> {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            debug!("browser close: {e}");
        }
        if let Err(e) = browser.wait().await {
            debug!("browser wait: {e}");
        }
        Ok(())
    }
}

/// A single Chromium page.
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> DriverResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Javascript(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| DriverError::Javascript(format!("failed to convert JS result: {e}")))
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> DriverResult<()> {
        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;
        match result {
            Ok(Ok(_response)) => {
                // Bounded: the load event can dawdle on media-heavy pages.
                let _ = tokio::time::timeout(timeout, self.page.wait_for_navigation()).await;
                Ok(())
            }
            Ok(Err(e)) => Err(DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(DriverError::NavigationTimeout {
                url: url.to_string(),
                ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn current_url(&self) -> DriverResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| DriverError::Page(e.to_string()))?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    async fn html(&self) -> DriverResult<String> {
        self.eval("document.documentElement.outerHTML".to_string())
            .await
    }

    async fn is_visible(&self, selector: &str) -> DriverResult<bool> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el) return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()"#,
            sanitize_js_string(selector)
        );
        self.eval(script).await
    }

    async fn click_by_text(&self, patterns: &[String], timeout: Duration) -> DriverResult<bool> {
        let needles = serde_json::to_string(patterns)
            .map_err(|e| DriverError::Javascript(e.to_string()))?;
        // Buttons only: clicking a text-matching anchor could navigate away.
        let script = format!(
            r#"(() => {{
                const needles = JSON.parse('{}');
                const candidates = [...document.querySelectorAll('button, [role="button"]')];
                const hit = candidates.find(el => {{
                    const rect = el.getBoundingClientRect();
                    if (rect.width === 0 || rect.height === 0) return false;
                    return needles.some(n => (el.textContent || '').includes(n));
                }});
                if (!hit) return false;
                hit.click();
                return true;
            }})()"#,
            sanitize_js_string(&needles)
        );

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.eval::<bool>(script.clone()).await? {
                return Ok(true);
            }
            if tokio::time::Instant::now() + CLICK_POLL > deadline {
                return Ok(false);
            }
            tokio::time::sleep(CLICK_POLL).await;
        }
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Screenshot(e.to_string()))
    }

    async fn restore_session(&self, state: &SessionState) -> DriverResult<()> {
        let cookies: Vec<CookieParam> = serde_json::from_value(state.cookies.clone())
            .map_err(|e| DriverError::Session(format!("cookie bundle does not decode: {e}")))?;
        if cookies.is_empty() && state.local_storage.is_empty() {
            return Ok(());
        }

        // A fresh page sits on about:blank, where CDP refuses to attach
        // cookies and localStorage has no origin. Land on the saved origin
        // before applying either.
        self.goto(&state.origin, RESTORE_NAV_TIMEOUT).await?;

        let count = cookies.len();
        if count > 0 {
            self.page
                .set_cookies(cookies)
                .await
                .map_err(|e| DriverError::Session(e.to_string()))?;
        }
        debug!("restored {count} cookies for {}", state.origin);

        if !state.local_storage.is_empty() {
            let payload = serde_json::to_string(&state.local_storage)
                .map_err(|e| DriverError::Session(e.to_string()))?;
            let script = format!(
                r#"(() => {{
                    const entries = JSON.parse('{}');
                    for (const [key, value] of entries) {{
                        localStorage.setItem(key, value);
                    }}
                    return entries.length;
                }})()"#,
                sanitize_js_string(&payload)
            );
            let seeded: i64 = self.eval(script).await?;
            debug!("seeded {seeded} localStorage entries on {}", state.origin);
        }
        Ok(())
    }

    async fn capture_session(&self, origin: &str) -> DriverResult<SessionState> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| DriverError::Session(e.to_string()))?;
        let cookies = serde_json::to_value(&cookies)
            .map_err(|e| DriverError::Session(e.to_string()))?;

        // Storage capture is best-effort: cookies alone usually suffice.
        let local_storage = match self
            .eval::<String>(
                r#"(() => {
                    const out = [];
                    for (let i = 0; i < localStorage.length; i++) {
                        const key = localStorage.key(i);
                        out.push([key, localStorage.getItem(key)]);
                    }
                    return JSON.stringify(out);
                })()"#
                    .to_string(),
            )
            .await
        {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(e) => {
                warn!("localStorage capture failed (cookies only): {e}");
                Vec::new()
            }
        };

        Ok(SessionState {
            origin: origin.to_string(),
            saved_at: Utc::now().to_rfc3339(),
            cookies,
            local_storage,
        })
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        let _ = self.page.close().await;
        Ok(())
    }
}

/// Escape a string for embedding in a single-quoted JS string literal.
fn sanitize_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '`' => result.push_str("\\`"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => {}                       // Strip null bytes
            '<' => result.push_str("\\x3c"), // Prevent </script> injection
            '>' => result.push_str("\\x3e"),
            _ => result.push(ch),
        }
    }
    result
}
