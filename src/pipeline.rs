//! The page build: read, convert, assemble, reformat, write.
//!
//! ```text
//! page.toml ─┐
//!            ▼
//! input.md → markdown::render → headings ─ filter(max_level) → toc::render_toc_ul
//!                             ↘ body ───────────────────────────┐          │
//!                                                               ▼          ▼
//!                                           generate::render_section(page, toc, body)
//!                                                               │
//!                                     prettify::reformat ◄──────┘
//!                                               │
//!                         generate::render_document → output.html
//! ```
//!
//! Any failure is fatal. The output file is written once, after the whole
//! document has been assembled in memory.

use crate::config::{self, ConfigError, PageConfig};
use crate::types::{Heading, headings_up_to};
use crate::{generate, markdown, prettify, toc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What a build produced, for reporting.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Every heading in the document, in order.
    pub headings: Vec<Heading>,
    /// Deepest level listed in the side menu.
    pub max_level: u8,
    /// Number of headings listed in the side menu.
    pub toc_entries: usize,
    /// Size of the written page in bytes.
    pub bytes: usize,
}

/// Build the page described by `page.toml` (or the defaults) in `root`.
pub fn build(root: &Path) -> Result<BuildSummary, BuildError> {
    let config = config::load_config(root)?;
    log::info!(
        "config loaded: {} -> {}",
        config.input,
        config.output
    );
    build_with_config(root, &config)
}

/// Build the page with an already resolved config.
pub fn build_with_config(root: &Path, config: &PageConfig) -> Result<BuildSummary, BuildError> {
    let input = root.join(&config.input);
    let output = root.join(&config.output);

    let source = fs::read_to_string(&input).map_err(|source| BuildError::Io {
        path: input.clone(),
        source,
    })?;

    let document = render_page(config, &source);
    let bytes = document.html.len();

    fs::write(&output, &document.html).map_err(|source| BuildError::Io {
        path: output.clone(),
        source,
    })?;
    log::info!("wrote {} ({} bytes)", output.display(), bytes);

    Ok(BuildSummary {
        input,
        output,
        headings: document.headings,
        max_level: config.toc.max_level,
        toc_entries: document.toc_entries,
        bytes,
    })
}

/// A fully assembled page, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub headings: Vec<Heading>,
    pub toc_entries: usize,
}

/// Turn Markdown source into the final page text. Pure: no I/O.
pub fn render_page(config: &PageConfig, source: &str) -> RenderedPage {
    let rendered = markdown::render(source, &config.headings.h1_class);
    log::info!(
        "converted markdown: {} headings, {} bytes of html",
        rendered.headings.len(),
        rendered.html.len()
    );

    let listed = headings_up_to(&rendered.headings, config.toc.max_level);
    let toc_html = toc::render_toc_ul(&listed);

    let section = generate::render_section(&config.page, &toc_html, &rendered.html).into_string();
    if let Err(err) = prettify::check_well_formed(&section) {
        log::warn!("assembled page markup is not balanced: {err}");
    }
    let section = prettify::reformat(&section);

    RenderedPage {
        html: generate::render_document(config, &section),
        headings: rendered.headings,
        toc_entries: listed.len(),
    }
}
