//! Shared types passed between pipeline stages.
//!
//! Headings are produced by [`crate::markdown`], filtered by the pipeline,
//! consumed by [`crate::toc`] and reported by [`crate::output`].

use serde::{Deserialize, Serialize};

/// A heading extracted from the Markdown document.
///
/// Headings arrive in document order. Consecutive levels may jump by any
/// amount in either direction; consumers must not assume a valid outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id rendered on the heading element (`toc_3`, or an explicit `{#id}`)
    pub id: String,
    /// Plain display text of the heading
    pub text: String,
    /// Nesting level, 1 for `#`, 6 for `######`
    pub level: u8,
}

impl Heading {
    pub fn new(id: impl Into<String>, text: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            level,
        }
    }
}

/// Keep only headings at or above `max_level` (numerically `<=`).
pub fn headings_up_to(headings: &[Heading], max_level: u8) -> Vec<Heading> {
    headings
        .iter()
        .filter(|h| h.level <= max_level)
        .cloned()
        .collect()
}
