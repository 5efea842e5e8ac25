//! Shared types used across the pipeline.
//!
//! These types are serialized into the scan manifest and must stay stable for
//! whatever consumes it (the rendering layer, preview tooling).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Validated front-matter of a content item.
///
/// Produced only by [`crate::schema::validate`]; there is no way to get one
/// from a partially-valid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Non-empty, trimmed title.
    pub title: String,
    /// Short description shown in listings. May be empty.
    pub summary: String,
    /// Calendar date the item was published.
    pub publish_date: NaiveDate,
    /// Drafts are loaded but never listed publicly.
    #[serde(default)]
    pub draft: bool,
    /// Tag set. Duplicates collapse; order is irrelevant.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Explicit slug from the `slug` key, replacing the path-derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// One article after loading: validated metadata, derived slug, opaque body.
///
/// Constructed once per build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Source path relative to the content root, `/`-separated
    /// (e.g. `blog/observer-pattern.md`).
    pub id: String,
    /// Name of the owning collection.
    pub collection: String,
    /// URL path segment(s), unique within the collection.
    pub slug: String,
    pub metadata: Metadata,
    /// Everything after the front-matter block, untouched.
    pub body: String,
    /// Estimated reading time in whole minutes (at least 1).
    pub reading_minutes: u32,
}

impl ContentItem {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn summary(&self) -> &str {
        &self.metadata.summary
    }

    pub fn publish_date(&self) -> NaiveDate {
        self.metadata.publish_date
    }

    pub fn is_draft(&self) -> bool {
        self.metadata.draft
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.contains(tag)
    }
}

/// A loaded collection: valid items in source enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub items: Vec<ContentItem>,
}

impl Collection {
    /// Find an item by slug.
    pub fn get(&self, slug: &str) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.slug == slug)
    }

    pub fn draft_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_draft()).count()
    }
}
