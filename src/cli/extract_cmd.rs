//! Run one full extraction against a package URL.

use crate::cli::output::{self, Styled};
use crate::config::{ExtractorConfig, SiteProfile};
use crate::crawler::Crawler;
use crate::driver::chromium::ChromiumDriver;
use crate::driver::Driver;
use crate::session::SessionStore;
use crate::status::{self, Severity};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Run the extract command.
pub async fn run(url: &str, output_path: PathBuf, headless: bool) -> Result<()> {
    let s = Styled::new();

    let config = ExtractorConfig {
        output_path,
        headless,
        ..ExtractorConfig::default()
    };
    let store = SessionStore::new(config.session_path());

    if !output::is_quiet() {
        if store.exists() {
            eprintln!(
                "  {} Saved session found at {}; manual login will be skipped.",
                s.ok_sym(),
                store.path().display()
            );
            eprintln!("  To use a different account, run `syllabo session clear` first.");
        } else {
            eprintln!();
            eprintln!("  {}", "=".repeat(62));
            eprintln!("  >>> MANUAL LOGIN REQUIRED <<<");
            eprintln!("  A browser window will open. Complete the login there; the");
            eprintln!("  extraction continues automatically once login is detected.");
            eprintln!("  {}", "=".repeat(62));
            eprintln!();
        }
    }

    let driver = Arc::new(ChromiumDriver::launch(headless).await?);
    let (tx, mut rx) = status::channel();
    let crawler = Crawler::new(config, SiteProfile::default()).with_status(tx);

    let worker = {
        let driver = Arc::clone(&driver);
        let url = url.trim().to_string();
        tokio::spawn(async move { crawler.run(driver.as_ref(), &url).await })
    };

    loop {
        match rx.recv().await {
            Ok(update) => {
                if output::is_quiet() && update.severity != Severity::Error {
                    continue;
                }
                let sym = match update.severity {
                    Severity::Info => s.info_sym(),
                    Severity::Warn => s.warn_sym(),
                    Severity::Error => s.err_sym(),
                    Severity::Success => s.ok_sym(),
                };
                eprintln!("  {sym} {}", update.message);
            }
            Err(RecvError::Lagged(skipped)) => {
                eprintln!("  {} (skipped {skipped} status updates)", s.warn_sym());
            }
            Err(RecvError::Closed) => break,
        }
    }

    // Shut the browser down before surfacing any worker failure.
    let join_result = worker.await;
    driver.shutdown().await.ok();
    let run_result = join_result.context("extraction task panicked")?;

    match run_result {
        Ok(summary) => {
            if !output::is_quiet() {
                println!();
                println!(
                    "  {} {} disciplines extracted ({} with errors) in {:.1}s",
                    s.ok_sym(),
                    summary.disciplines_total,
                    summary.disciplines_failed,
                    summary.elapsed_ms as f64 / 1000.0
                );
                println!("  Report: {}", summary.output_path.display());
            }
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{}: {e}", e.kind())),
    }
}
