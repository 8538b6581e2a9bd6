//! Shared test utilities for the mdpage test suite.
//!
//! Provides heading builders, a fixture loader and small markup counters.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let html = render_toc_ul(&headings_at(&[1, 2, 2, 1]));
//! assert_eq!(count_tags(&html, "<ul"), 2);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::Heading;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Heading builders
// =========================================================================

pub fn heading(id: &str, text: &str, level: u8) -> Heading {
    Heading::new(id, text, level)
}

/// Build one heading per level, with ids `toc_1..` and texts `Heading 1..`.
pub fn headings_at(levels: &[u8]) -> Vec<Heading> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            Heading::new(format!("toc_{}", i + 1), format!("Heading {}", i + 1), level)
        })
        .collect()
}

// =========================================================================
// Markup assertions
// =========================================================================

/// Count non-overlapping occurrences of `needle` in `html`.
pub fn count_tags(html: &str, needle: &str) -> usize {
    html.matches(needle).count()
}
