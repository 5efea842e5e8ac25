//! Slug derivation.
//!
//! A slug is the routing key of a content item. It comes from the item's path
//! inside its collection directory, or from an explicit `slug` front-matter
//! override:
//!
//! | Input | Slug |
//! |-------|------|
//! | `observer-pattern.md` | `observer-pattern` |
//! | `Mutex and Semaphore.mdx` | `mutex-and-semaphore` |
//! | `sorting/Quick Sort.md` | `sorting/quick-sort` |
//! | `mvp/index.md` | `mvp` |
//! | `MVP 패턴.md` | `mvp-패턴` |
//!
//! Each path segment is lowercased and every run of whitespace or URL-unsafe
//! characters becomes a single `-`. Unicode letters and digits are kept, so
//! Korean or Japanese titles stay readable in the address bar.
//!
//! Derivation is deterministic. Uniqueness is a collection-level property and
//! is checked by the loader.

use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("`{0}` does not produce a usable slug")]
    Empty(String),
}

/// Derive the slug for an item at `relative` (path inside the collection dir).
///
/// `override_slug` wins when present and is normalized the same way.
pub fn derive_slug(relative: &Path, override_slug: Option<&str>) -> Result<String, SlugError> {
    let slug = match override_slug {
        Some(raw) => slugify_path(raw.split('/')),
        None => {
            let without_ext = relative.with_extension("");
            let mut segments: Vec<String> = without_ext
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            // `foo/index.md` is served as `foo`
            if segments.len() > 1 && segments
                    .last()
                    .is_some_and(|s| s.eq_ignore_ascii_case("index")) {
                segments.pop();
            }
            slugify_path(segments.iter().map(String::as_str))
        }
    };

    if slug.is_empty() {
        let source = override_slug
            .map(str::to_string)
            .unwrap_or_else(|| relative.to_string_lossy().into_owned());
        return Err(SlugError::Empty(source));
    }
    Ok(slug)
}

/// Slugify each segment and join the non-empty ones with `/`.
fn slugify_path<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments
        .map(slugify_segment)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase `text` and collapse everything that is not a letter, digit,
/// `-` or `_` into single hyphens.
pub fn slugify_segment(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            // any other run of characters becomes one separator
            pending_dash = true;
        }
    }
    slug
}
