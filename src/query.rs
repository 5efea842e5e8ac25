//! Listing queries over a loaded collection.
//!
//! Pure, total functions: they never fail, never mutate, and return borrowed
//! items so results can be chained without cloning bodies:
//!
//! ```text
//! index page   paginate(public_listing(items), 10)
//! tag page     filter_by_tag(public_listing(items), "Architecture")
//! tags index   group_by_tag(exclude_drafts(items))
//! search page  search(public_listing(items), "typescript")
//! post page    neighbors(&public_listing(items), "observer-pattern")
//! ```
//!
//! Every function accepts anything that iterates `&ContentItem`, so both
//! `&collection.items` and the `Vec<&ContentItem>` returned by another query
//! work as input.

use crate::types::ContentItem;
use std::collections::BTreeMap;

/// Remove draft items. Public listings always go through this.
pub fn exclude_drafts<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Vec<&'a ContentItem> {
    items.into_iter().filter(|i| !i.is_draft()).collect()
}

/// Newest first. The sort is stable, so items sharing a date keep their
/// relative input order.
pub fn sort_by_date_descending<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> Vec<&'a ContentItem> {
    let mut sorted: Vec<&ContentItem> = items.into_iter().collect();
    sorted.sort_by(|a, b| b.publish_date().cmp(&a.publish_date()));
    sorted
}

/// Items carrying `tag`, matched exactly (case-sensitive).
pub fn filter_by_tag<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    tag: &str,
) -> Vec<&'a ContentItem> {
    items.into_iter().filter(|i| i.has_tag(tag)).collect()
}

/// Case-insensitive substring search over title, summary and tags.
///
/// Input order is preserved; there is no relevance ranking. A blank query
/// matches everything.
pub fn search<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    query: &str,
) -> Vec<&'a ContentItem> {
    let needle = query.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| needle.is_empty() || matches_query(item, &needle))
        .collect()
}

fn matches_query(item: &ContentItem, needle: &str) -> bool {
    item.title().to_lowercase().contains(needle)
        || item.summary().to_lowercase().contains(needle)
        || item
            .metadata
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
}

/// Group items by tag, for tag index pages.
///
/// Tags are ordered by name; within a tag, items keep their input order. An
/// item with several tags appears in each group.
pub fn group_by_tag<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> BTreeMap<&'a str, Vec<&'a ContentItem>> {
    let mut groups: BTreeMap<&str, Vec<&ContentItem>> = BTreeMap::new();
    for item in items {
        for tag in &item.metadata.tags {
            groups.entry(tag.as_str()).or_default().push(item);
        }
    }
    groups
}

/// Non-draft items, newest first.
pub fn public_listing<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> Vec<&'a ContentItem> {
    sort_by_date_descending(exclude_drafts(items))
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    pub items: Vec<&'a ContentItem>,
}

impl Page<'_> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Split `items` into pages of `per_page` (a value of 0 counts as 1).
///
/// An empty listing still yields one empty page so the index route exists.
pub fn paginate<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    per_page: usize,
) -> Vec<Page<'a>> {
    let per_page = per_page.max(1);
    let items: Vec<&ContentItem> = items.into_iter().collect();
    let total_pages = items.len().div_ceil(per_page).max(1);

    if items.is_empty() {
        return vec![Page {
            number: 1,
            total_pages,
            items,
        }];
    }

    items
        .chunks(per_page)
        .enumerate()
        .map(|(i, chunk)| Page {
            number: i + 1,
            total_pages,
            items: chunk.to_vec(),
        })
        .collect()
}

/// Items adjacent to a post in a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Neighbors<'a> {
    pub newer: Option<&'a ContentItem>,
    pub older: Option<&'a ContentItem>,
}

/// Neighbors of `slug` within `listing` (expected newest first).
///
/// Unknown slugs have no neighbors.
pub fn neighbors<'a>(listing: &[&'a ContentItem], slug: &str) -> Neighbors<'a> {
    let Some(pos) = listing.iter().position(|i| i.slug == slug) else {
        return Neighbors::default();
    };
    Neighbors {
        newer: pos.checked_sub(1).map(|p| listing[p]),
        older: listing.get(pos + 1).copied(),
    }
}
