//! Front-matter schema validation.
//!
//! Turns the loosely-typed [`RawFrontMatter`] map into a typed [`Metadata`],
//! or a [`SchemaError`] naming *every* offending field. Nothing is coerced
//! silently: a number where a string belongs is a violation, not a conversion.
//!
//! ## Fields
//!
//! | Key | Type | Required | Default |
//! |-----|------|----------|---------|
//! | `title` | non-blank string | yes | |
//! | `summary` | string | yes | |
//! | `date` (or `publishDate`, `pubDate`) | date string | yes | |
//! | `draft` | bool | no | `false` |
//! | `tags` | list of non-blank strings | no | empty |
//! | `slug` | non-blank string | no | derived from path |
//!
//! A `null` value counts as absent. Unknown keys are ignored so articles can
//! carry fields meant for other tools.

use crate::frontmatter::RawFrontMatter;
use crate::types::Metadata;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Keys accepted for the publish date, checked in order.
pub const DATE_KEYS: &[&str] = &["date", "publishDate", "pubDate"];

/// One validation failure, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Blank,
    InvalidDate(String),
    /// Element `index` of a list field has the wrong type or is blank.
    InvalidElement {
        index: usize,
        found: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{}: missing", self.field),
            Problem::WrongType { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.field)
            }
            Problem::Blank => write!(f, "{}: must not be blank", self.field),
            Problem::InvalidDate(raw) => {
                write!(f, "{}: `{raw}` is not a valid date", self.field)
            }
            Problem::InvalidElement { index, found } => write!(
                f,
                "{}[{index}]: expected non-blank string, found {found}",
                self.field
            ),
        }
    }
}

/// Every violation found in one front-matter block, in field order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid front-matter: {}", join(.violations))]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl SchemaError {
    /// Whether `field` is among the violations.
    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a raw front-matter map.
///
/// Pure: the same input always produces the same output.
pub fn validate(raw: &RawFrontMatter) -> Result<Metadata, SchemaError> {
    let mut violations = Vec::new();

    let title = required_string(raw, "title", &mut violations)
        .and_then(|t| non_blank(t, "title", &mut violations))
        .map(|t| t.trim().to_string());

    let summary = required_string(raw, "summary", &mut violations).map(str::to_string);

    let publish_date = publish_date(raw, &mut violations);

    let draft = match present(raw, "draft") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            violations.push(wrong_type("draft", "boolean", other));
            false
        }
    };

    let tags = tags(raw, &mut violations);

    let slug = match present(raw, "slug") {
        None => None,
        Some(Value::String(s)) => non_blank(s, "slug", &mut violations).map(str::to_string),
        Some(other) => {
            violations.push(wrong_type("slug", "string", other));
            None
        }
    };

    match (title, summary, publish_date) {
        (Some(title), Some(summary), Some(publish_date)) if violations.is_empty() => Ok(Metadata {
            title,
            summary,
            publish_date,
            draft,
            tags,
            slug,
        }),
        _ => Err(SchemaError { violations }),
    }
}

/// Parse the date grammars accepted in front-matter.
///
/// `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`, and
/// `YYYY-MM-DD HH:MM:SS +hhmm`. Only the calendar date is kept; with an
/// offset, that is the date in the writer's own zone.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const NAIVE: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    const OFFSET: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M %z"];

    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date_naive());
    }
    NAIVE
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

// ============================================================================
// Field helpers
// ============================================================================

/// Look up `key`, treating `null` as absent.
fn present<'a>(raw: &'a RawFrontMatter, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

fn required_string<'a>(
    raw: &'a RawFrontMatter,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match present(raw, field) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            violations.push(wrong_type(field, "string", other));
            None
        }
        None => {
            violations.push(Violation {
                field,
                problem: Problem::Missing,
            });
            None
        }
    }
}

fn non_blank<'a>(
    value: &'a str,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    if value.trim().is_empty() {
        violations.push(Violation {
            field,
            problem: Problem::Blank,
        });
        None
    } else {
        Some(value)
    }
}

fn publish_date(raw: &RawFrontMatter, violations: &mut Vec<Violation>) -> Option<NaiveDate> {
    // Problems with a value are reported under the key that carried it
    let Some((field, value)) = DATE_KEYS
        .iter()
        .find_map(|&key| present(raw, key).map(|value| (key, value)))
    else {
        violations.push(Violation {
            field: DATE_KEYS[0],
            problem: Problem::Missing,
        });
        return None;
    };

    match value {
        Value::String(s) => {
            let date = parse_date(s);
            if date.is_none() {
                violations.push(Violation {
                    field,
                    problem: Problem::InvalidDate(s.clone()),
                });
            }
            date
        }
        other => {
            violations.push(wrong_type(field, "date string", other));
            None
        }
    }
}

fn tags(raw: &RawFrontMatter, violations: &mut Vec<Violation>) -> BTreeSet<String> {
    const FIELD: &str = "tags";

    let items = match present(raw, FIELD) {
        None => return BTreeSet::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            violations.push(wrong_type(FIELD, "list of strings", other));
            return BTreeSet::new();
        }
    };

    let mut tags = BTreeSet::new();
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) if !s.trim().is_empty() => {
                tags.insert(s.trim().to_string());
            }
            other => violations.push(Violation {
                field: FIELD,
                problem: Problem::InvalidElement {
                    index,
                    found: type_name(other),
                },
            }),
        }
    }
    tags
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> Violation {
    Violation {
        field,
        problem: Problem::WrongType {
            expected,
            found: type_name(found),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(s) if s.trim().is_empty() => "blank string",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
