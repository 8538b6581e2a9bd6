//! Page assembly.
//!
//! Combines the fixed page content from [`PageConfig`], the side menu markup
//! and the converted Markdown body into the final document:
//!
//! ```text
//! ---                          front matter (YAML)
//! title: …
//! ---
//! <section class="section-blue section-main">
//!   … title, illustration, description
//!   <nav class="fr-sidemenu …">  side menu (TOC)
//!   <div class="… markdown">     converted body
//! </section>
//! <script type="text/javascript">…</script>
//! ```
//!
//! ## HTML Generation
//!
//! The section layout is a [maud](https://maud.lambda.xyz/) template, so a
//! malformed layout fails to compile instead of producing a broken page.
//! Title, illustration URL and labels are escaped; the description, the side
//! menu and the body are already HTML and are inserted as-is.

use crate::config::{FrontMatterConfig, PageConfig, PageContent};
use maud::{Markup, PreEscaped, html};

/// Renders the page section: header row, side menu and body columns.
pub fn render_section(page: &PageContent, toc: &str, body: &str) -> Markup {
    html! {
        section class="section-blue section-main" {
            div class="fr-container" {
                div class="fr-grid-row fr-grid-row--gutters" {
                    div class="fr-col fr-col-12 fr-col-md-6 fr-col-offset-1" {
                        h1 class="fr-display--sm" { (page.title) }
                    }
                    div class="fr-col fr-col-12 fr-col-md-4" {
                        img class="fr-responsive-img" src=(page.illustration_url) alt="";
                    }
                    div class="fr-col-12" {
                        div class="fr-highlight fr-my-6w" {
                            (PreEscaped(&page.description))
                        }
                    }
                    div class="fr-col-12 fr-col-md-4" {
                        (side_menu(page, toc))
                    }
                    div class="fr-col-12 fr-col-md-8 markdown" {
                        (PreEscaped(body))
                    }
                }
            }
        }
    }
}

/// Renders the sticky side menu wrapping the TOC lists.
fn side_menu(page: &PageContent, toc: &str) -> Markup {
    html! {
        nav class="fr-sidemenu fr-sidemenu--sticky-full-height"
            aria-label=(page.menu_aria_label)
            style="min-width:230px;" {
            div class="fr-sidemenu__inner" {
                button class="fr-sidemenu__btn" hidden
                    aria-controls="fr-sidemenu-wrapper"
                    aria-expanded="false" { (page.menu_label) }
                div class="fr-collapse" id="fr-sidemenu-wrapper" {
                    (PreEscaped(toc))
                }
            }
        }
    }
}

/// Renders the inline script appended after the section.
pub fn render_script(script: &str) -> Markup {
    html! {
        script type="text/javascript" {
            (PreEscaped(format!("\n    {script}\n")))
        }
    }
}

/// Renders the front matter block, delimited by `---` lines.
pub fn render_front_matter(front_matter: &FrontMatterConfig) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("title: {}\n", yaml_scalar(&front_matter.title)));
    if front_matter.keywords.is_empty() {
        out.push_str("keywords: []\n");
    } else {
        out.push_str("keywords:\n");
        for keyword in &front_matter.keywords {
            out.push_str(&format!("  - {}\n", yaml_scalar(keyword)));
        }
    }
    out.push_str(&format!(
        "description: {}\n",
        yaml_scalar(&front_matter.description)
    ));
    out.push_str(&format!(
        "content_type: {}\n",
        yaml_scalar(&front_matter.content_type)
    ));
    out.push_str("---\n");
    out
}

/// Quote a YAML scalar only when plain style would change its meaning.
fn yaml_scalar(value: &str) -> String {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.starts_with(INDICATORS)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.contains('\n')
        || matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "null" | "~"
        );
    if needs_quotes {
        format!(
            "\"{}\"",
            value
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
        )
    } else {
        value.to_string()
    }
}

/// Joins front matter, the (already reformatted) section and the script.
pub fn render_document(config: &PageConfig, section: &str) -> String {
    let parts = [
        render_front_matter(&config.front_matter),
        section.to_string(),
        render_script(&config.page.script).into_string() + "\n",
    ];
    parts.join("\n")
}
