//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every item leads with
//! its positional index and title; the source file, slug, and date follow as
//! indented context lines. The output reads as a content inventory while still
//! letting an author trace each entry back to a file.
//!
//! # Output Format
//!
//! ## Scan / Check
//!
//! ```text
//! Collections
//! 001 blog (5 items, 1 draft)
//!     Source: blog/
//!     001 Mutex and Semaphore
//!         Source: blog/mutex-and-semaphore.md
//!         Slug: mutex-and-semaphore
//!         Date: 2023-12-01 · 1 min
//!     002 Proxy Pattern (draft)
//!         ...
//!
//! Rejected
//!     blog/broken.md
//!         date: `someday` is not a valid date
//!
//! Site
//!     Dev Notes
//!     site.toml
//! ```
//!
//! ## List / Search
//!
//! ```text
//! 001 2024-06-01 TypeScript/JavaScript에서 MVP 패턴 구현
//!     Slug: mvp-pattern-typescript
//!     Tags: Architecture, TypeScript
//!
//! Page 1 of 2
//! ```
//!
//! ## Tags
//!
//! ```text
//! 001 Architecture (1 item)
//!     001 TypeScript/JavaScript에서 MVP 패턴 구현
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::CONFIG_FILE;
use crate::query::Page;
use crate::scan::ScanResult;
use crate::types::{Collection, ContentItem};
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 item`, `3 items`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 blog (5 items, 1 draft)
/// 002 Observer Pattern
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn tag_list(item: &ContentItem) -> String {
    item.metadata
        .tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Index line plus context lines for one item.
fn item_lines(index: usize, item: &ContentItem, depth: usize) -> Vec<String> {
    let base = indent(depth);
    let detail = item.is_draft().then_some("draft");
    let mut lines = vec![format!("{}{}", base, entity_header(index, item.title(), detail))];
    lines.push(format!("{}    Source: {}", base, item.id));
    lines.push(format!("{}    Slug: {}", base, item.slug));
    lines.push(format!(
        "{}    Date: {} · {} min",
        base,
        item.publish_date(),
        item.reading_minutes
    ));
    if !item.metadata.tags.is_empty() {
        lines.push(format!("{}    Tags: {}", base, tag_list(item)));
    }
    lines
}

/// One-line listing entry: index, date, title, then slug/tags/summary.
fn listing_lines(index: usize, item: &ContentItem) -> Vec<String> {
    let draft = if item.is_draft() { " (draft)" } else { "" };
    let mut lines = vec![format!(
        "{} {} {}{}",
        format_index(index),
        item.publish_date(),
        item.title(),
        draft
    )];
    lines.push(format!("    Slug: {}", item.slug));
    if !item.metadata.tags.is_empty() {
        lines.push(format!("    Tags: {}", tag_list(item)));
    }
    let summary = truncate_desc(item.summary().trim(), 60);
    if !summary.is_empty() {
        lines.push(format!("    {}", summary));
    }
    lines
}

// ============================================================================
// Scan / check output
// ============================================================================

fn collection_detail(collection: &Collection) -> String {
    let drafts = collection.draft_count();
    let items = count(collection.items.len(), "item");
    if drafts == 0 {
        items
    } else {
        format!("{items}, {}", count(drafts, "draft"))
    }
}

/// Format scan output: collections with their items, rejected files, site.
pub fn format_scan_output(result: &ScanResult, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Collections".to_string()];

    for (i, collection) in result.manifest.collections.iter().enumerate() {
        let config = result.config.collections.get(&collection.name);
        let dir = config
            .map(|c| c.dir_for(&collection.name))
            .unwrap_or(&collection.name);
        lines.push(entity_header(
            i + 1,
            &collection.name,
            Some(collection_detail(collection).as_str()),
        ));
        lines.push(format!("    Source: {}/", dir));
        for (j, item) in collection.items.iter().enumerate() {
            lines.extend(item_lines(j + 1, item, 1));
        }
    }

    if !result.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for name in &result.skipped {
            lines.push(format!("    {} (no directory)", name));
        }
    }

    if !result.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected".to_string());
        for err in &result.rejected {
            lines.push(format!("    {}", err.id));
            for reason in err.reasons() {
                lines.push(format!("        {}", reason));
            }
        }
    }

    lines.push(String::new());
    lines.push("Site".to_string());
    lines.push(format!("    {}", result.manifest.site.title));
    if source_root.join(CONFIG_FILE).exists() {
        lines.push(format!("    {}", CONFIG_FILE));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(result: &ScanResult, source_root: &Path) {
    for line in format_scan_output(result, source_root) {
        println!("{}", line);
    }
}

/// Closing line of `check`.
pub fn format_check_summary(result: &ScanResult) -> String {
    let loaded: usize = result
        .manifest
        .collections
        .iter()
        .map(|c| c.items.len())
        .sum();
    if result.is_clean() {
        format!("==> Content is valid ({})", count(loaded, "item"))
    } else {
        format!(
            "==> {} rejected, {} loaded",
            count(result.rejected.len(), "file"),
            count(loaded, "item")
        )
    }
}

// ============================================================================
// List / search output
// ============================================================================

/// Format one page of a listing.
///
/// Item indices continue across pages (`page 2` of 10-per-page starts at 011).
pub fn format_listing(page: &Page<'_>, per_page: usize) -> Vec<String> {
    if page.items.is_empty() {
        return vec!["No items".to_string()];
    }
    let offset = (page.number - 1) * per_page.max(1);
    let mut lines = Vec::new();
    for (i, item) in page.items.iter().enumerate() {
        lines.extend(listing_lines(offset + i + 1, item));
    }
    if page.total_pages > 1 {
        lines.push(String::new());
        lines.push(format!("Page {} of {}", page.number, page.total_pages));
    }
    lines
}

pub fn print_listing(page: &Page<'_>, per_page: usize) {
    for line in format_listing(page, per_page) {
        println!("{}", line);
    }
}

/// Format search results for `query`.
pub fn format_search_results(query: &str, items: &[&ContentItem]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} for \"{}\"",
        count(items.len(), "result"),
        query.trim()
    )];
    for (i, item) in items.iter().enumerate() {
        lines.extend(listing_lines(i + 1, item));
    }
    lines
}

pub fn print_search_results(query: &str, items: &[&ContentItem]) {
    for line in format_search_results(query, items) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags output
// ============================================================================

/// Format the tag index: one header per tag, its items beneath.
pub fn format_tags(groups: &BTreeMap<&str, Vec<&ContentItem>>) -> Vec<String> {
    if groups.is_empty() {
        return vec!["No tags".to_string()];
    }
    let mut lines = Vec::new();
    for (i, (tag, items)) in groups.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            tag,
            Some(count(items.len(), "item").as_str()),
        ));
        for (j, item) in items.iter().enumerate() {
            lines.push(format!("    {}", entity_header(j + 1, item.title(), None)));
        }
    }
    lines
}

pub fn print_tags(groups: &BTreeMap<&str, Vec<&ContentItem>>) {
    for line in format_tags(groups) {
        println!("{}", line);
    }
}
