//! Core outline types: the package → discipline → lesson structure.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discipline link discovered on the package page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineRef {
    /// Trimmed visible title of the card link.
    pub name: String,
    /// Absolute URL of the discipline page, resolved against the package page.
    pub url: String,
}

/// Extraction outcome for one discipline.
///
/// A failed discipline still gets an entry: its `lessons` hold a single
/// error-marker string so the report keeps one block per discovered card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineResult {
    /// Discipline title, as discovered.
    pub name: String,
    /// Filtered lesson titles in page order.
    pub lessons: Vec<String>,
}

/// The assembled course structure, disciplines in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStructure {
    /// Package title from the page, or a synthetic fallback.
    pub package_title: String,
    /// One entry per discovered discipline, order preserved.
    pub disciplines: Vec<DisciplineResult>,
}

impl CourseStructure {
    pub fn new(package_title: impl Into<String>) -> Self {
        Self {
            package_title: package_title.into(),
            disciplines: Vec::new(),
        }
    }

    /// Record the outcome for the next discipline in discovery order.
    pub fn push(&mut self, result: DisciplineResult) {
        self.disciplines.push(result);
    }
}

/// Final accounting for a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Title used in the report header.
    pub package_title: String,
    /// Disciplines discovered and processed.
    pub disciplines_total: usize,
    /// Disciplines whose lesson scrape failed (recorded as markers).
    pub disciplines_failed: usize,
    /// Where the report was written.
    pub output_path: PathBuf,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}
