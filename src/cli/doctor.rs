//! Environment readiness check.

use crate::config::{default_data_dir, ExtractorConfig};
use crate::driver::chromium::{find_browser, BROWSER_ENV};
use crate::session::SessionStore;
use anyhow::Result;

/// Check browser availability, data dir, and session state.
pub async fn run() -> Result<()> {
    println!("Syllabo Doctor");
    println!("==============");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check browser
    let browser = find_browser();
    match &browser {
        Some(path) => println!("[OK] Chromium/Chrome found: {}", path.display()),
        None => println!(
            "[!!] Chromium/Chrome NOT found. Install Chrome or set {BROWSER_ENV} to an executable."
        ),
    }

    // Check data dir
    let data_dir = default_data_dir();
    match std::fs::create_dir_all(&data_dir) {
        Ok(()) => println!("[OK] Data dir {} is writable", data_dir.display()),
        Err(e) => println!("[!!] Data dir {} is not writable: {e}", data_dir.display()),
    }

    // Check saved session
    let store = SessionStore::new(ExtractorConfig::default().session_path());
    match store.load() {
        Some(state) => println!(
            "[OK] Saved session for {} ({} cookies); extract runs skip manual login",
            state.origin,
            state.cookie_count()
        ),
        None if store.exists() => println!(
            "[!!] Session file {} exists but does not decode; run `syllabo session clear`",
            store.path().display()
        ),
        None => println!("[..] No saved session; first extract run will ask for a manual login"),
    }

    println!();
    let ready = browser.is_some();
    if ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
        println!("  Install Google Chrome or Chromium, or set {BROWSER_ENV}.");
    }

    Ok(())
}
