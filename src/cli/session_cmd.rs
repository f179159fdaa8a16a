//! Inspect or clear the persisted login session.

use crate::config::ExtractorConfig;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Show the persisted session, if any.
pub async fn run_show() -> Result<()> {
    let config = ExtractorConfig::default();
    let store = SessionStore::new(config.session_path());

    let Some(state) = store.load() else {
        println!("No saved session at {}.", store.path().display());
        println!("The next `syllabo extract` run will ask for a manual login.");
        return Ok(());
    };

    println!("Session file: {}", store.path().display());
    println!("Origin:       {}", state.origin);
    println!("Saved at:     {}{}", state.saved_at, age_suffix(&state.saved_at));
    println!("Cookies:      {}", state.cookie_count());
    println!("Storage keys: {}", state.local_storage.len());
    Ok(())
}

/// Delete the persisted session.
pub async fn run_clear() -> Result<()> {
    let config = ExtractorConfig::default();
    let store = SessionStore::new(config.session_path());

    if !store.exists() {
        println!("No saved session to remove at {}.", store.path().display());
        return Ok(());
    }
    store
        .invalidate()
        .with_context(|| format!("failed to remove {}", store.path().display()))?;
    println!("Removed {}.", store.path().display());
    println!("The next `syllabo extract` run will ask for a manual login.");
    Ok(())
}

/// Human age of the capture timestamp, empty when it does not parse.
fn age_suffix(saved_at: &str) -> String {
    let Ok(ts) = DateTime::parse_from_rfc3339(saved_at) else {
        return String::new();
    };
    let age = Utc::now().signed_duration_since(ts.with_timezone(&Utc));
    if age.num_days() >= 1 {
        format!(" ({} days ago)", age.num_days())
    } else if age.num_hours() >= 1 {
        format!(" ({} hours ago)", age.num_hours())
    } else {
        format!(" ({} minutes ago)", age.num_minutes().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_suffix_formats() {
        let two_days_ago = (Utc::now() - chrono::Duration::days(2)).to_rfc3339();
        assert_eq!(age_suffix(&two_days_ago), " (2 days ago)");

        let fresh = Utc::now().to_rfc3339();
        assert_eq!(age_suffix(&fresh), " (0 minutes ago)");

        assert_eq!(age_suffix("not-a-timestamp"), "");
    }
}
