//! Shared test utilities for the simple-blog test suite.
//!
//! Provides fixture setup, content-file writers, and lookup helpers that
//! panic with a useful message on a miss.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_item(tmp.path(), "blog/a.md", &post("A", "2024-01-01", "draft: true\n"), "body");
//!
//! let tmp = setup_fixtures();
//! let result = scan(tmp.path()).unwrap();
//! let item = find_item(&result.manifest.collections[0].items, "observer-pattern");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::ContentItem;

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
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Content writers
// =========================================================================

/// YAML front-matter for a valid post, plus any `extra` lines.
pub fn post(title: &str, date: &str, extra: &str) -> String {
    format!("title: \"{title}\"\nsummary: \"About {title}\"\ndate: {date}\n{extra}")
}

/// Write `root/relative` as a YAML front-matter file, creating parent dirs.
pub fn write_item(root: &Path, relative: &str, front_matter: &str, body: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, format!("---\n{front_matter}---\n{body}")).unwrap();
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an item by slug. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], slug: &str) -> &'a ContentItem {
    items.iter().find(|i| i.slug == slug).unwrap_or_else(|| {
        let slugs = item_slugs(items);
        panic!("item '{slug}' not found. Available: {slugs:?}")
    })
}

/// All slugs in order.
pub fn item_slugs(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|i| i.slug.as_str()).collect()
}

/// Slugs of a query result in order.
pub fn ref_slugs<'a>(items: &[&'a ContentItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.slug.as_str()).collect()
}
