//! Page configuration module.
//!
//! Handles loading, validating, and merging `page.toml`. Every value has a
//! stock default, so the file is optional; when present it only needs the
//! keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input = "donnees-geo-essentielles.md"   # Markdown source
//! output = "geo.html"                     # Generated page
//!
//! [page]
//! title = "Les données à composante géographique"
//! illustration_url = "https://…/163353375-….svg"
//! description = "<p>…</p>"                # Raw HTML, inserted unescaped
//! menu_label = "Dans cette rubrique"      # Collapsed side menu button
//! menu_aria_label = "Menu latéral"
//! script = "document.querySelector('.container.py-lg').classList.remove('container')"
//!
//! [front_matter]
//! title = "Ceci est un exemple"
//! keywords = ["geo", "adresses", "SIG", "geomatique", "geographie", "cartographie"]
//! description = "Page inventaire des données géographiques essentielles."
//! content_type = "html"
//!
//! [toc]
//! max_level = 2             # Deepest heading level listed in the side menu
//!
//! [headings]
//! h1_class = "fr-h1"        # Class added to <h1> elements of the body
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "page.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Page configuration loaded from `page.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Markdown source, relative to the working directory.
    pub input: String,
    /// Generated HTML page, relative to the working directory.
    pub output: String,
    /// Fixed page content around the converted document.
    pub page: PageContent,
    /// Metadata block written before the page markup.
    pub front_matter: FrontMatterConfig,
    /// Side menu settings.
    pub toc: TocConfig,
    /// Styling applied to headings of the converted body.
    pub headings: HeadingsConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            input: "donnees-geo-essentielles.md".to_string(),
            output: "geo.html".to_string(),
            page: PageContent::default(),
            front_matter: FrontMatterConfig::default(),
            toc: TocConfig::default(),
            headings: HeadingsConfig::default(),
        }
    }
}

impl PageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.toc.max_level) {
            return Err(ConfigError::Validation(
                "toc.max_level must be 1-6".into(),
            ));
        }
        if self.input.trim().is_empty() || self.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "input and output must not be empty".into(),
            ));
        }
        if self.input == self.output {
            return Err(ConfigError::Validation(
                "output must not overwrite input".into(),
            ));
        }
        if self.page.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page.title must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fixed content of the generated section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageContent {
    /// Page title, shown in the header column.
    pub title: String,
    /// Illustration shown next to the title.
    pub illustration_url: String,
    /// Introductory HTML fragment, inserted unescaped.
    pub description: String,
    /// Label of the side menu toggle button on small screens.
    pub menu_label: String,
    /// Accessible name of the side menu `<nav>`.
    pub menu_aria_label: String,
    /// Inline script appended after the section.
    pub script: String,
}

impl Default for PageContent {
    fn default() -> Self {
        Self {
            title: "Les données à composante géographique".to_string(),
            illustration_url: "https://user-images.githubusercontent.com/60264344/163353375-68ccb015-b845-4675-8ae7-35497aa2f5b8.svg".to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            menu_label: "Dans cette rubrique".to_string(),
            menu_aria_label: "Menu latéral".to_string(),
            script: "document.querySelector('.container.py-lg').classList.remove('container')"
                .to_string(),
        }
    }
}

const DEFAULT_DESCRIPTION: &str = r#"<p>Les données à composantes géographiques sont souvent indispensables pour réaliser des analyses. Sont référencées ici les principaux jeux de données disponibles sur <a href="http://data.gouv.fr/">data.gouv.fr</a>. Celle-ci n'est pas exhaustive et est <a href="https://github.com/etalab/datagouvfr-pages/blob/master/pages/donnees-coronavirus.md" target="_blank">ouverte aux contributions</a>.</p>
<p>Un certains nombre de ces données font office de référentiel qui servent de pivot avec d'autres jeux de données. Elles font parties <a href="https://www.data.gouv.fr/fr/pages/spd/reference/">du SPD (Service Public de la Donnée)</a>. Voir aussi <a href="https://guides.etalab.gouv.fr/qualite/lier-les-donnees-a-un-referentiel/" target="_blank">cet article sur comment lier des données à un référentiel</a></p>"#;

/// Front matter metadata consumed by the documentation site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontMatterConfig {
    pub title: String,
    pub keywords: Vec<String>,
    pub description: String,
    pub content_type: String,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            title: "Ceci est un exemple".to_string(),
            keywords: ["geo", "adresses", "SIG", "geomatique", "geographie", "cartographie"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            description: "Page inventaire des données géographiques essentielles.".to_string(),
            content_type: "html".to_string(),
        }
    }
}

/// Side menu settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Deepest heading level listed (inclusive). `2` lists `#` and `##`.
    pub max_level: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self { max_level: 2 }
    }
}

/// Heading styling for the converted body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingsConfig {
    /// Class added to every body `<h1>`. Empty disables it.
    pub h1_class: String,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            h1_class: "fr-h1".to_string(),
        }
    }
}

// =============================================================================
// page.toml loading
// =============================================================================

/// Serialize [`PageConfig::default`] so a sparse `page.toml` can be laid over it.
fn defaults_table() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PageConfig::default())?)
}

/// Lay the keys of `page.toml` over the defaults.
///
/// Sections such as `[page]` merge key by key, so overriding `page.title`
/// keeps the default `page.script`. Any other value, arrays included
/// (`front_matter.keywords`), replaces the default as a whole.
pub fn merge_toml(defaults: toml::Value, user: toml::Value) -> toml::Value {
    match (defaults, user) {
        (toml::Value::Table(mut table), toml::Value::Table(user_table)) => {
            for (key, user_val) in user_table {
                let merged = match table.remove(&key) {
                    Some(default_val) => merge_toml(default_val, user_val),
                    None => user_val,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, user) => user,
    }
}

/// Parse `page.toml` in `dir`, or `None` when the page uses only defaults.
fn read_page_toml(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Resolve the page config for a build run in `dir`.
///
/// A missing `page.toml` yields the stock page. Unknown keys fail the
/// typed conversion; out-of-range values fail [`PageConfig::validate`].
pub fn load_config(dir: &Path) -> Result<PageConfig, ConfigError> {
    let merged = match read_page_toml(dir)? {
        Some(user) => merge_toml(defaults_table()?, user),
        None => defaults_table()?,
    };
    let config: PageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_fixed_paths() {
        let config = PageConfig::default();
        assert_eq!(config.input, "donnees-geo-essentielles.md");
        assert_eq!(config.output, "geo.html");
    }

    #[test]
    fn default_config_lists_two_levels() {
        assert_eq!(PageConfig::default().toc.max_level, 2);
    }

    #[test]
    fn default_front_matter() {
        let fm = FrontMatterConfig::default();
        assert_eq!(fm.title, "Ceci est un exemple");
        assert_eq!(fm.keywords.len(), 6);
        assert_eq!(fm.keywords[0], "geo");
        assert_eq!(fm.content_type, "html");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[toc]
max_level = 3
"#;
        let config: PageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.toc.max_level, 3);
        // Defaults preserved
        assert_eq!(config.headings.h1_class, "fr-h1");
        assert_eq!(config.page.menu_label, "Dans cette rubrique");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output, "geo.html");
        assert_eq!(config.front_matter.keywords.len(), 6);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
output = "out.html"

[page]
title = "Autre page"

[front_matter]
keywords = ["a"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output, "out.html");
        assert_eq!(config.page.title, "Autre page");
        assert_eq!(config.front_matter.keywords, vec!["a".to_string()]);
        // Untouched siblings keep their defaults
        assert_eq!(config.page.menu_label, "Dans cette rubrique");
        assert_eq!(config.front_matter.title, "Ceci est un exemple");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[toc]
depth = 3
"#;
        assert!(toml::from_str::<PageConfig>(toml).is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "stylesheet = \"x.css\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables_keep_siblings() {
        let base: toml::Value = toml::from_str("[page]\ntitle = \"x\"\nscript = \"y\"").unwrap();
        let overlay: toml::Value = toml::from_str("[page]\ntitle = \"z\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["page"]["title"].as_str(), Some("z"));
        assert_eq!(merged["page"]["script"].as_str(), Some("y"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("k = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("k = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["k"].as_array().map(|a| a.len()), Some(1));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_max_level_bounds() {
        let mut config = PageConfig::default();
        config.toc.max_level = 0;
        assert!(config.validate().is_err());
        config.toc.max_level = 7;
        assert!(config.validate().is_err());
        config.toc.max_level = 6;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_output_must_differ_from_input() {
        let mut config = PageConfig::default();
        config.output = config.input.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_title() {
        let mut config = PageConfig::default();
        config.page.title = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_value_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[toc]\nmax_level = 9\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
