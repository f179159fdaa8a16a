//! Render and persist the extracted course structure.

use crate::errors::ExtractError;
use crate::outline::CourseStructure;
use std::path::Path;

/// Placeholder block line for a discipline with no surviving lesson titles.
pub const EMPTY_DISCIPLINE_PLACEHOLDER: &str = "   [no lessons found or extraction failed]";

/// Render `structure` into the report lines. Pure, no side effects.
///
/// Layout: a header with the package title, an `=` underline of matching
/// length, and a blank line; then per discipline a numbered title line, one
/// indented bullet per lesson (or a single placeholder when the lesson list
/// is empty), and a trailing blank line. Line count is therefore always
/// `3 + sum(1 + max(1, lessons) + 1)`.
pub fn render(structure: &CourseStructure) -> Vec<String> {
    let header = format!("Package/Course: {}", structure.package_title);
    let underline = "=".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(
        3 + structure
            .disciplines
            .iter()
            .map(|d| 2 + d.lessons.len().max(1))
            .sum::<usize>(),
    );
    lines.push(header);
    lines.push(underline);
    lines.push(String::new());

    for (i, discipline) in structure.disciplines.iter().enumerate() {
        lines.push(format!("{}. Discipline: {}", i + 1, discipline.name));
        if discipline.lessons.is_empty() {
            lines.push(EMPTY_DISCIPLINE_PLACEHOLDER.to_string());
        } else {
            for lesson in &discipline.lessons {
                lines.push(format!("   - {lesson}"));
            }
        }
        lines.push(String::new());
    }

    lines
}

/// Write the rendered report, replacing any previous file wholesale.
pub fn write_output(path: &Path, lines: &[String]) -> Result<(), ExtractError> {
    std::fs::write(path, lines.join("\n")).map_err(|source| ExtractError::Output {
        path: path.to_path_buf(),
        source,
    })
}
