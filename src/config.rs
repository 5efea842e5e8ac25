//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! overridden by the user's file in the content root; the user file is sparse
//! and only needs the keys it changes.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── site.toml                # Site config (optional)
//! ├── blog/                    # Collection "blog"
//! │   ├── observer-pattern.md
//! │   └── sorting/
//! │       └── quick-sort.md
//! └── notes/                   # Another collection, if configured
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "My Blog"
//! description = ""
//! author = ""
//!
//! [[site.nav]]
//! text = "Home"
//! href = "/"
//!
//! [collections.blog]
//! dir = "blog"              # Directory under the content root
//! required = true           # Zero valid items is a fatal error
//! extensions = ["md", "mdx"]
//!
//! [processing]
//! max_processes = 4         # Max parallel parse workers (omit for auto = CPU cores)
//! ```
//!
//! Tables merge key-by-key; arrays (nav, social, extensions) replace the
//! default wholesale. Unknown keys are rejected to catch typos early.

use crate::site::SiteMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// File name of the site config inside the content root.
pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Metadata shown on every page.
    pub site: SiteMetadata,
    /// Content collections keyed by name.
    pub collections: BTreeMap<String, CollectionConfig>,
    /// Parallel parsing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(
            "blog".to_string(),
            CollectionConfig {
                dir: Some("blog".to_string()),
                required: true,
                ..CollectionConfig::default()
            },
        );
        Self {
            site: SiteMetadata::default(),
            collections,
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// The site metadata record handed to every page.
    pub fn site(&self) -> &SiteMetadata {
        &self.site
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        for (i, link) in self.site.nav.iter().enumerate() {
            if link.text.trim().is_empty() || link.href.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site.nav[{i}] needs both text and href"
                )));
            }
        }
        for (i, link) in self.site.social.iter().enumerate() {
            if link.name.trim().is_empty() || link.href.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site.social[{i}] needs both name and href"
                )));
            }
        }
        if self.collections.is_empty() {
            return Err(ConfigError::Validation(
                "at least one collection must be configured".into(),
            ));
        }
        for (name, collection) in &self.collections {
            collection.validate(name)?;
        }
        Ok(())
    }
}

/// One named collection of content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Directory relative to the content root. Defaults to the collection name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// A required collection with zero valid items fails the build.
    pub required: bool,
    /// File extensions (without dot, case-insensitive) that belong to the collection.
    pub extensions: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            dir: None,
            required: false,
            extensions: vec!["md".to_string(), "mdx".to_string()],
        }
    }
}

impl CollectionConfig {
    /// Directory of the collection named `name`, relative to the content root.
    pub fn dir_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.dir.as_deref().unwrap_or(name)
    }

    /// Whether `path` has one of the collection's extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let dir = self.dir_for(name);
        let escapes_root = Path::new(dir)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if dir.trim().is_empty() || escapes_root {
            return Err(ConfigError::Validation(format!(
                "collections.{name}.dir must be a relative path inside the content root"
            )));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(format!(
                "collections.{name}.extensions must not be empty"
            )));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel parse workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root as site.toml. Tables merge with the
# defaults key by key; arrays (nav, social, extensions) replace them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata (available to every page)
# ---------------------------------------------------------------------------
[site]
title = "My Blog"
description = ""
author = ""

# Per-section title/description, e.g.:
# [site.pages.blog]
# title = "Blog"
# description = "All articles"

# Header navigation, in display order.
[[site.nav]]
text = "Home"
href = "/"

[[site.nav]]
text = "Blog"
href = "/blog"

[[site.nav]]
text = "Tags"
href = "/tags"

# Footer social links, e.g.:
# [[site.social]]
# name = "GitHub"
# icon = "github"
# text = "GitHub"
# href = "https://github.com/you"

# ---------------------------------------------------------------------------
# Collections
# ---------------------------------------------------------------------------
# Each collection is a directory of Markdown/MDX files sharing one schema.
[collections.blog]
# Directory under the content root (defaults to the collection name).
dir = "blog"
# A required collection with zero valid items fails the build.
required = true
# File extensions that belong to the collection.
extensions = ["md", "mdx"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel parse workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_blog_collection() {
        let config = SiteConfig::default();
        let blog = &config.collections["blog"];
        assert_eq!(blog.dir_for("blog"), "blog");
        assert!(blog.required);
        assert_eq!(blog.extensions, vec!["md", "mdx"]);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
title = "Dev Notes"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Dev Notes");
        // Defaults preserved
        assert_eq!(config.site.nav.len(), 3);
        assert!(config.collections.contains_key("blog"));
    }

    #[test]
    fn collection_dir_defaults_to_name() {
        let collection = CollectionConfig::default();
        assert_eq!(collection.dir_for("notes"), "notes");
        assert!(!collection.required);
    }

    #[test]
    fn collection_accepts_extensions_case_insensitively() {
        let collection = CollectionConfig::default();
        assert!(collection.accepts(Path::new("a.md")));
        assert!(collection.accepts(Path::new("a.MDX")));
        assert!(!collection.accepts(Path::new("a.txt")));
        assert!(!collection.accepts(Path::new("README")));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[site]
title = "Dev Notes"
author = "Jane"

[[site.social]]
name = "GitHub"
icon = "github"
text = "GitHub"
href = "https://github.com/jane"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Dev Notes");
        assert_eq!(config.site.author, "Jane");
        assert_eq!(config.site.social.len(), 1);
        // Unspecified values should be defaults
        assert_eq!(config.site.nav.len(), 3);
    }

    #[test]
    fn load_config_nav_replaces_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[[site.nav]]
text = "About"
href = "/about"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.nav.len(), 1);
        assert_eq!(config.site.nav[0].text, "About");
    }

    #[test]
    fn load_config_adds_collection_next_to_blog() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[collections.notes]
extensions = ["md"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        let names: Vec<&str> = config.collections.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["blog", "notes"]);
        assert_eq!(config.collections["notes"].dir_for("notes"), "notes");
        assert_eq!(config.collections["notes"].extensions, vec!["md"]);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"title = "a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"title = "b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("title").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[site]
title = "Blog"
author = "Jane"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
title = "Notes"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let site = merged.get("site").unwrap();
        assert_eq!(site.get("title").unwrap().as_str(), Some("Notes"));
        assert_eq!(site.get("author").unwrap().as_str(), Some("Jane"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"extensions = ["md", "mdx"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"extensions = ["markdown"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("extensions").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[site]
titel = "Typo"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r##"
[colors.light]
background = "#fff"
"##;
        assert!(toml::from_str::<SiteConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_collection_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[collections.blog]
directory = "posts"
"#,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    fn resolve(overlay: &str) -> Result<SiteConfig, ConfigError> {
        let overlay: toml::Value = toml::from_str(overlay).unwrap();
        resolve_config(stock_defaults_value(), Some(overlay))
    }

    #[test]
    fn validate_blank_title() {
        let result = resolve("[site]\ntitle = \"  \"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_nav_needs_href() {
        let result = resolve("[[site.nav]]\ntext = \"Blog\"\nhref = \"\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_collection_dir_must_stay_inside_root() {
        for dir in ["../outside", "/abs/path", ""] {
            let result = resolve(&format!("[collections.blog]\ndir = \"{dir}\"\n"));
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "dir {dir:?} accepted"
            );
        }
    }

    #[test]
    fn validate_extensions_not_empty() {
        let result = resolve("[collections.blog]\nextensions = []\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[site]"));
        assert!(content.contains("[[site.nav]]"));
        assert!(content.contains("[collections.blog]"));
        assert!(content.contains("[processing]"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("site").is_some());
        assert!(val.get("collections").is_some());
        assert!(val.get("processing").is_some());
    }
}
