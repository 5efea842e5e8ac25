//! Front-matter extraction.
//!
//! A content file starts with a metadata block followed by the body:
//!
//! ```text
//! ---                          +++
//! title: Observer Pattern      title = "Observer Pattern"
//! date: 2024-01-01             date = 2024-01-01
//! tags: [JavaScript]           tags = ["JavaScript"]
//! ---                          +++
//! Body markup...               Body markup...
//! ```
//!
//! `---` opens a YAML block (closed by `---` or `...`), `+++` opens a TOML
//! block. Both are parsed into the same untyped [`RawFrontMatter`] map so the
//! schema validator sees one shape regardless of source format. The body is
//! returned untouched.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Untyped key/value mapping read from a front-matter block.
pub type RawFrontMatter = Map<String, Value>;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("no front-matter block (file must start with `---` or `+++`)")]
    Missing,
    #[error("{0} front-matter block is never closed")]
    Unterminated(Format),
    #[error("YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front-matter must be a key/value mapping")]
    NotAMapping,
    #[error("front-matter key must be a string, found {0}")]
    NonStringKey(String),
}

/// Syntax of a front-matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn from_opening(line: &str) -> Option<Self> {
        match line {
            "---" => Some(Format::Yaml),
            "+++" => Some(Format::Toml),
            _ => None,
        }
    }

    fn is_closing(self, line: &str) -> bool {
        match self {
            Format::Yaml => line == "---" || line == "...",
            Format::Toml => line == "+++",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => f.write_str("YAML"),
            Format::Toml => f.write_str("TOML"),
        }
    }
}

/// A source file cut into its front-matter text and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub format: Format,
    /// Text between the delimiters, delimiters excluded.
    pub front_matter: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub format: Format,
    pub front_matter: RawFrontMatter,
    pub body: &'a str,
}

/// Cut `source` at its front-matter delimiters without interpreting the block.
pub fn split(source: &str) -> Result<Split<'_>, FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (opening, rest) = next_line(source).ok_or(FrontMatterError::Missing)?;
    let format = Format::from_opening(opening.trim_end()).ok_or(FrontMatterError::Missing)?;

    let mut remaining = rest;
    let mut block_len = 0;
    while let Some((line, after)) = next_line(remaining) {
        if format.is_closing(line.trim_end()) {
            return Ok(Split {
                format,
                front_matter: &rest[..block_len],
                body: after,
            });
        }
        block_len += remaining.len() - after.len();
        remaining = after;
    }

    Err(FrontMatterError::Unterminated(format))
}

/// Split `source` and parse its front-matter block into a [`RawFrontMatter`].
pub fn parse(source: &str) -> Result<Document<'_>, FrontMatterError> {
    let split = split(source)?;
    let front_matter = match split.format {
        Format::Yaml => parse_yaml(split.front_matter)?,
        Format::Toml => parse_toml(split.front_matter)?,
    };
    Ok(Document {
        format: split.format,
        front_matter,
        body: split.body,
    })
}

/// Next line without its terminator (`\n` or `\r\n`), plus the text after it.
fn next_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(pos) => Some((s[..pos].trim_end_matches('\r'), &s[pos + 1..])),
        None => Some((s.trim_end_matches('\r'), "")),
    }
}

// ============================================================================
// YAML
// ============================================================================

fn parse_yaml(block: &str) -> Result<RawFrontMatter, FrontMatterError> {
    let blank = block.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(RawFrontMatter::new());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(block)? {
        serde_yaml::Value::Mapping(map) => yaml_mapping(map),
        serde_yaml::Value::Null => Ok(RawFrontMatter::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn yaml_mapping(map: serde_yaml::Mapping) -> Result<RawFrontMatter, FrontMatterError> {
    use serde_yaml::Value as Yaml;

    map.into_iter()
        .map(|(key, value)| {
            let key = match key {
                Yaml::String(s) => s,
                Yaml::Bool(b) => b.to_string(),
                Yaml::Number(n) => n.to_string(),
                other => return Err(FrontMatterError::NonStringKey(format!("{other:?}"))),
            };
            Ok((key, yaml_to_json(value)?))
        })
        .collect()
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, FrontMatterError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => Value::Object(yaml_mapping(map)?),
        // Custom tags (`!foo bar`) are dropped; the schema only cares about the value
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

// ============================================================================
// TOML
// ============================================================================

fn parse_toml(block: &str) -> Result<RawFrontMatter, FrontMatterError> {
    let table: toml::Table = block.parse()?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        // native dates keep only their calendar part
        toml::Value::Datetime(dt) => match dt.date {
            Some(date) => Value::String(date.to_string()),
            None => Value::String(dt.to_string()),
        },
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// JSON has no NaN/infinity; those become null.
fn float(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
