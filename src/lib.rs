//! # mdpage
//!
//! Builds one static documentation page from one Markdown file: the converted
//! document on the right, a sticky side menu listing its headings on the left,
//! a fixed title, illustration and introduction on top.
//!
//! # Pipeline
//!
//! ```text
//! 1. Convert   input.md  →  body html + headings   (pulldown-cmark)
//! 2. Menu      headings  →  nested <ul> side menu   (level stack)
//! 3. Assemble  config + menu + body → <section>     (maud)
//! 4. Reformat  <section> →  indented markup         (html5ever tokenizer + regex)
//! 5. Write     front matter + section + script → output.html
//! ```
//!
//! Every step but the last is a pure function of its inputs, so the whole
//! page can be rendered in tests with [`pipeline::render_page`] without
//! touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markdown`] | Markdown → HTML, heading ids and classes, heading extraction |
//! | [`toc`] | Flat heading list → nested side menu lists |
//! | [`generate`] | Page section layout, front matter, trailing script |
//! | [`prettify`] | Re-indentation and balance check of the assembled markup |
//! | [`pipeline`] | Read → render → write, build summary |
//! | [`config`] | `page.toml` loading, merging over stock defaults, validation |
//! | [`types`] | The `Heading` record shared between stages |
//! | [`output`] | Build summary formatting |
//!
//! # Design Decisions
//!
//! ## Fixed Inputs
//!
//! The tool takes no arguments. It reads `donnees-geo-essentielles.md` and
//! writes `geo.html` in the working directory; `page.toml` next to them can
//! change those paths and every piece of fixed page content.
//!
//! ## Heading Ids
//!
//! Headings are anchored as `toc_1`, `toc_2`, … in document order rather
//! than slugs of their text, so anchors stay stable when a heading is
//! reworded. An explicit `{#id}` on a heading wins.

pub mod config;
pub mod generate;
pub mod markdown;
pub mod output;
pub mod pipeline;
pub mod prettify;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
