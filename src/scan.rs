//! Content scanning and manifest generation.
//!
//! First stage of the build. Reads `site.toml`, loads every configured
//! collection, and produces a [`Manifest`] that later stages (rendering,
//! preview tooling) consume as JSON.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root (--source)
//! ├── site.toml                    # Site configuration (optional)
//! ├── blog/                        # Default collection
//! │   ├── observer-pattern.md      # → slug "observer-pattern"
//! │   ├── proxy-pattern.mdx        # TOML (+++) front-matter works too
//! │   ├── _template.md             # `_` prefix: skipped
//! │   └── sorting/
//! │       ├── index.md             # → slug "sorting"
//! │       └── quick-sort.md        # → slug "sorting/quick-sort"
//! └── notes/                       # Extra collection from [collections.notes]
//! ```
//!
//! ## Output
//!
//! A [`ScanResult`]: the serializable [`Manifest`] (site metadata plus each
//! collection's items in enumeration order) and the files that were rejected.
//! Rejections are reported to the operator but never written to the manifest.
//!
//! ## Failure policy
//!
//! Config errors and fatal [`LoadError`]s abort the scan. A collection that
//! is not `required` and has no directory is skipped; a required one is a
//! [`LoadError::MissingSource`].

use crate::collection::{self, ItemError, LoadError};
use crate::config::{self, CollectionConfig, SiteConfig};
use crate::site::SiteMetadata;
use crate::types::Collection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the manifest inside the temp directory.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown collection `{0}`")]
    UnknownCollection(String),
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub site: SiteMetadata,
    /// Loaded collections, in name order.
    pub collections: Vec<Collection>,
}

impl Manifest {
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// `name`, or the only collection when `name` is `None`.
    ///
    /// With several collections and no name, falls back to `blog`.
    pub fn select(&self, name: Option<&str>) -> Result<&Collection, ScanError> {
        let name = match name {
            Some(n) => n,
            None if self.collections.len() == 1 => return Ok(&self.collections[0]),
            None => "blog",
        };
        self.collection(name)
            .ok_or_else(|| ScanError::UnknownCollection(name.to_string()))
    }
}

/// Everything a scan produced.
#[derive(Debug)]
pub struct ScanResult {
    pub manifest: Manifest,
    pub config: SiteConfig,
    /// Rejected files across all collections, grouped by collection in name
    /// order and by enumeration order within a collection.
    pub rejected: Vec<ItemError>,
    /// Optional collections whose directory does not exist.
    pub skipped: Vec<String>,
}

impl ScanResult {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Scan the content root, reading `site.toml` from it.
pub fn scan(root: &Path) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(LoadError::MissingSource(root.to_path_buf()).into());
    }
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan the content root with an already-loaded config.
pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(LoadError::MissingSource(root.to_path_buf()).into());
    }

    let mut collections = Vec::with_capacity(config.collections.len());
    let mut rejected = Vec::new();
    let mut skipped = Vec::new();

    for (name, collection_config) in &config.collections {
        if !collection_config.required && !collection_dir(root, name, collection_config).is_dir() {
            skipped.push(name.clone());
            continue;
        }
        let loaded = collection::load(root, name, collection_config)?;
        collections.push(loaded.collection);
        rejected.extend(loaded.rejected);
    }

    Ok(ScanResult {
        manifest: Manifest {
            site: config.site.clone(),
            collections,
        },
        config,
        rejected,
        skipped,
    })
}

fn collection_dir(root: &Path, name: &str, config: &CollectionConfig) -> PathBuf {
    root.join(config.dir_for(name))
}

/// Write the manifest as pretty JSON to `temp_dir/manifest.json`.
pub fn write_manifest(manifest: &Manifest, temp_dir: &Path) -> Result<PathBuf, ScanError> {
    std::fs::create_dir_all(temp_dir)?;
    let path = temp_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read a manifest written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Manifest, ScanError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
