//! CLI output formatting for the build summary.
//!
//! The summary is a heading inventory: every heading of the document with its
//! positional index, indented by level, and marked when it is listed in the
//! side menu. Paths are shown as secondary context.
//!
//! ```text
//! Source: donnees-geo-essentielles.md
//! Headings (5, 4 in side menu)
//! 001 Adresses #toc_1 *
//!     002 BAN #toc_2 *
//!         003 Détails #toc_3
//!     004 Cadastre #toc_4 *
//! 005 Limites #toc_5 *
//! Output: geo.html (18342 bytes)
//! ```
//!
//! `format_build_output` is pure and returns lines for testability;
//! `print_build_output` writes them to stdout.

use crate::pipeline::BuildSummary;
use crate::types::Heading;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format one heading line, indented by level and starred when listed.
fn heading_line(index: usize, heading: &Heading, max_level: u8) -> String {
    let depth = usize::from(heading.level.saturating_sub(1));
    let listed = if heading.level <= max_level { " *" } else { "" };
    format!(
        "{}{} {} #{}{}",
        indent(depth),
        format_index(index),
        heading.text,
        heading.id,
        listed
    )
}

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![format!("Source: {}", summary.input.display())];

    if summary.headings.is_empty() {
        lines.push("Headings (none)".to_string());
    } else {
        lines.push(format!(
            "Headings ({}, {} in side menu)",
            summary.headings.len(),
            summary.toc_entries
        ));
        for (idx, heading) in summary.headings.iter().enumerate() {
            lines.push(heading_line(idx + 1, heading, summary.max_level));
        }
    }

    lines.push(format!(
        "Output: {} ({} bytes)",
        summary.output.display(),
        summary.bytes
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}
