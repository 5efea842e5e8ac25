//! Site metadata shared by every page.
//!
//! Title, author, per-section page records, navigation and social links. The
//! record is read from the `[site]` section of `site.toml` once at startup and
//! handed to consumers by reference; nothing mutates it afterwards.
//!
//! ```toml
//! [site]
//! title = "Dev Notes"
//! description = "Design patterns and CS fundamentals"
//! author = "Jane Doe"
//!
//! [site.pages.blog]
//! title = "Blog"
//! description = "All articles"
//!
//! [[site.nav]]
//! text = "Blog"
//! href = "/blog"
//!
//! [[site.social]]
//! name = "GitHub"
//! icon = "github"
//! text = "Follow on GitHub"
//! href = "https://github.com/janedoe"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Per-section `title`/`description`, keyed by section name (`blog`, `tags`, ...).
    pub pages: BTreeMap<String, PageMeta>,
    /// Header navigation, in display order.
    pub nav: Vec<NavLink>,
    /// Footer social entries, in display order.
    pub social: Vec<SocialLink>,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),
            pages: BTreeMap::new(),
            nav: vec![
                NavLink::new("Home", "/"),
                NavLink::new("Blog", "/blog"),
                NavLink::new("Tags", "/tags"),
            ],
            social: Vec::new(),
        }
    }
}

impl SiteMetadata {
    /// Title and description for a section page.
    ///
    /// Sections without their own record fall back to the site-wide values.
    pub fn page(&self, section: &str) -> PageMeta {
        self.pages.get(section).cloned().unwrap_or_else(|| PageMeta {
            title: self.title.clone(),
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub text: String,
    pub href: String,
}

impl NavLink {
    pub fn new(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub name: String,
    /// Icon identifier understood by the theme (e.g. `github`).
    #[serde(default)]
    pub icon: String,
    pub text: String,
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_falls_back_to_site_values() {
        let site = SiteMetadata {
            title: "Dev Notes".into(),
            description: "Patterns".into(),
            ..SiteMetadata::default()
        };
        let page = site.page("search");
        assert_eq!(page.title, "Dev Notes");
        assert_eq!(page.description, "Patterns");
    }

    #[test]
    fn page_uses_section_record() {
        let mut site = SiteMetadata::default();
        site.pages.insert(
            "blog".into(),
            PageMeta {
                title: "Blog".into(),
                description: "All articles".into(),
            },
        );
        assert_eq!(site.page("blog").title, "Blog");
    }

    #[test]
    fn parse_full_site_section() {
        let toml = r#"
            title = "Dev Notes"
            description = "Design patterns"
            author = "Jane"

            [pages.blog]
            title = "Blog"

            [[nav]]
            text = "Blog"
            href = "/blog"

            [[nav]]
            text = "About"
            href = "/about"

            [[social]]
            name = "GitHub"
            icon = "github"
            text = "GitHub"
            href = "https://github.com/jane"
        "#;
        let site: SiteMetadata = toml::from_str(toml).unwrap();
        assert_eq!(site.author, "Jane");
        assert_eq!(site.pages["blog"].description, "");
        let nav: Vec<&str> = site.nav.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(nav, vec!["Blog", "About"]);
        assert_eq!(site.social[0].icon, "github");
    }

    #[test]
    fn unknown_nav_key_rejected() {
        let toml = r#"
            [[nav]]
            text = "Blog"
            href = "/blog"
            target = "_blank"
        "#;
        assert!(toml::from_str::<SiteMetadata>(toml).is_err());
    }

    #[test]
    fn default_nav_order() {
        let nav: Vec<String> = SiteMetadata::default()
            .nav
            .into_iter()
            .map(|n| n.href)
            .collect();
        assert_eq!(nav, vec!["/", "/blog", "/tags"]);
    }
}
