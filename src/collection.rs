//! Collection loading.
//!
//! Turns one collection directory into an ordered list of validated
//! [`ContentItem`]s:
//!
//! ```text
//! enumerate (walkdir, sorted)  →  read  →  front-matter  →  schema  →  slug
//!                                 └──────── per file, in parallel ────────┘
//!                              →  aggregate (duplicate slugs, empty check)
//! ```
//!
//! ## Failure policy
//!
//! A broken file fails only itself: its [`ItemError`] is collected into
//! [`LoadedCollection::rejected`] and the load continues. The load as a whole
//! fails ([`LoadError`]) when the source is missing, when two valid items
//! share a slug, or when a required collection ends up with no valid items.
//!
//! ## Ordering
//!
//! Files are enumerated recursively in file-name order. Per-file work runs on
//! the rayon pool, but `collect` on an indexed parallel iterator keeps input
//! order, so `items` always follows enumeration order regardless of which file
//! finished first. Callers wanting date order sort explicitly
//! ([`crate::query::sort_by_date_descending`]).
//!
//! Hidden entries (`.foo`) and entries starting with `_` are skipped, so
//! partials and work files can live next to articles.

use crate::config::CollectionConfig;
use crate::frontmatter::{self, FrontMatterError};
use crate::schema::{self, SchemaError};
use crate::slug::{SlugError, derive_slug};
use crate::types::{Collection, ContentItem};
use pulldown_cmark::{Event, Parser};
use rayon::prelude::*;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Reading speed used for [`ContentItem::reading_minutes`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Fatal load failures. The build cannot continue past these.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Content source not found: {0}")]
    MissingSource(PathBuf),
    #[error("Content source unreadable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Duplicate slug `{slug}` in collection `{collection}`: {first} and {second}")]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: String,
        second: String,
    },
    #[error("Collection `{collection}` has no valid items ({rejected} rejected)")]
    EmptyCollection { collection: String, rejected: usize },
}

/// A single content file that could not be loaded.
#[derive(Error, Debug)]
#[error("{id}: {kind}")]
pub struct ItemError {
    /// Source path relative to the content root.
    pub id: String,
    pub kind: ItemErrorKind,
}

#[derive(Error, Debug)]
pub enum ItemErrorKind {
    #[error("unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Slug(#[from] SlugError),
}

impl ItemError {
    /// Human-readable reasons, one per line of operator output.
    ///
    /// Schema failures expand to one entry per violated field.
    pub fn reasons(&self) -> Vec<String> {
        match &self.kind {
            ItemErrorKind::Schema(err) => err.violations.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// Result of loading one collection.
#[derive(Debug)]
pub struct LoadedCollection {
    pub collection: Collection,
    /// Files that were skipped, in enumeration order.
    pub rejected: Vec<ItemError>,
}

/// Load the collection `name` from `root`.
///
/// `root` is the content root; the collection lives in
/// `root/<config.dir_for(name)>`. Item ids are relative to `root`, slugs to
/// the collection directory.
pub fn load(
    root: &Path,
    name: &str,
    config: &CollectionConfig,
) -> Result<LoadedCollection, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingSource(root.to_path_buf()));
    }
    let dir = root.join(config.dir_for(name));
    if !dir.is_dir() {
        return Err(LoadError::MissingSource(dir));
    }

    let entries = enumerate(root, &dir, config)?;

    let results: Vec<Result<ContentItem, ItemError>> = entries
        .into_par_iter()
        .map(|entry| entry.and_then(|path| load_item(root, &dir, name, &path)))
        .collect();

    let mut items = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();
    for result in results {
        match result {
            Ok(item) => items.push(item),
            Err(err) => rejected.push(err),
        }
    }

    check_unique_slugs(name, &items)?;

    if items.is_empty() && config.required {
        return Err(LoadError::EmptyCollection {
            collection: name.to_string(),
            rejected: rejected.len(),
        });
    }

    Ok(LoadedCollection {
        collection: Collection {
            name: name.to_string(),
            items,
        },
        rejected,
    })
}

/// All files of the collection, in stable file-name order.
///
/// Symlinks are followed. An entry below the collection dir that cannot be
/// read (dangling link, link loop, permissions) becomes an [`ItemError`] in
/// its place; only failing to read the collection dir itself is fatal.
fn enumerate(
    root: &Path,
    dir: &Path,
    config: &CollectionConfig,
) -> Result<Vec<Result<PathBuf, ItemError>>, LoadError> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e.file_name()));

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && config.accepts(entry.path()) {
                    entries.push(Ok(entry.into_path()));
                }
            }
            Err(source) if source.depth() == 0 => {
                return Err(LoadError::Unreadable {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(source) => {
                let id = relative_id(root, source.path().unwrap_or(dir));
                entries.push(Err(ItemError {
                    id,
                    kind: ItemErrorKind::Io(source.into()),
                }));
            }
        }
    }
    Ok(entries)
}

fn is_excluded(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

/// Read, parse, validate, and slug one file.
fn load_item(
    root: &Path,
    dir: &Path,
    collection: &str,
    path: &Path,
) -> Result<ContentItem, ItemError> {
    let id = relative_id(root, path);
    let fail = |kind: ItemErrorKind| ItemError {
        id: id.clone(),
        kind,
    };

    let source = fs::read_to_string(path).map_err(|e| fail(e.into()))?;
    let document = frontmatter::parse(&source).map_err(|e| fail(e.into()))?;
    let metadata = schema::validate(&document.front_matter).map_err(|e| fail(e.into()))?;
    let relative = path.strip_prefix(dir).unwrap_or(path);
    let slug = derive_slug(relative, metadata.slug.as_deref()).map_err(|e| fail(e.into()))?;

    Ok(ContentItem {
        id,
        collection: collection.to_string(),
        slug,
        reading_minutes: reading_minutes(document.body),
        body: document.body.to_string(),
        metadata,
    })
}

/// `/`-joined path of `path` relative to `root`.
fn relative_id(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn check_unique_slugs(collection: &str, items: &[ContentItem]) -> Result<(), LoadError> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(first) = seen.insert(&item.slug, &item.id) {
            return Err(LoadError::DuplicateSlug {
                collection: collection.to_string(),
                slug: item.slug.clone(),
                first: first.to_string(),
                second: item.id.clone(),
            });
        }
    }
    Ok(())
}

/// Estimated reading time of a Markdown body, in whole minutes (at least 1).
///
/// Counts words in text and inline code; markup, HTML and link targets are
/// not counted.
pub fn reading_minutes(body: &str) -> u32 {
    let words: usize = Parser::new(body)
        .map(|event| match event {
            Event::Text(text) | Event::Code(text) => text.split_whitespace().count(),
            _ => 0,
        })
        .sum();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}
