//! # Simple Blog
//!
//! The content pipeline of a static blog. Markdown files with a front-matter
//! block go in; validated, slugged, queryable articles come out.
//!
//! # Architecture: Load, Then Query
//!
//! ```text
//! content/blog/*.md ─► front-matter ─► schema ─► slug ─► Collection
//!                                                           │
//!              listing, tag pages, search, pagination  ◄── query
//! ```
//!
//! Loading happens once per build and produces immutable data. Everything
//! after that is a pure function over borrowed items, so every listing a page
//! might need can be computed on demand without touching the filesystem again.
//!
//! The `scan` command writes the loaded collections plus site metadata to a
//! JSON manifest for whatever renders the HTML.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Splits `---` YAML / `+++` TOML front-matter from the body |
//! | [`schema`] | Validates raw front-matter into typed [`types::Metadata`] |
//! | [`slug`] | Derives URL slugs from file paths (or an explicit `slug` key) |
//! | [`collection`] | Loads a collection directory, in parallel, in stable order |
//! | [`query`] | Draft filtering, date sort, tag filter, search, pagination |
//! | [`site`] | Site-wide metadata: title, page records, nav, social links |
//! | [`config`] | `site.toml` loading, merging over defaults, validation |
//! | [`scan`] | Config + every collection → manifest and rejection report |
//! | [`types`] | Shared types serialized into the manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Bad Files Fail Alone
//!
//! A file with broken front-matter is rejected with every violated field
//! listed, and the build continues with the rest. Only problems that make the
//! site itself wrong abort: two items claiming the same URL, or a required
//! collection with nothing in it.
//!
//! ## Explicit Metadata Type
//!
//! Front-matter is parsed into a loose key/value map first and then checked
//! field by field into [`types::Metadata`]. Nothing downstream sees an
//! unvalidated value, and defaults (`draft = false`, no tags) are applied in
//! exactly one place.
//!
//! ## Deterministic Order
//!
//! Files are enumerated in file-name order and parsed on the rayon pool;
//! results are collected back in enumeration order. Two builds of the same
//! tree produce the same manifest byte for byte.

pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod output;
pub mod query;
pub mod scan;
pub mod schema;
pub mod site;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
