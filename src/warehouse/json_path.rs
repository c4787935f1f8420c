//! Minimal JSONPaths evaluation for the local bulk-copy loader.
//!
//! Supports the subset Redshift accepts in a JSONPaths file: a root `$`
//! followed by dotted keys, bracketed quoted keys and array indices, e.g.
//! `$['artist']`, `$.song.title` or `$["tags"][0]`.

use super::WarehouseError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JsonPath {
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct JsonPathsFile {
    jsonpaths: Vec<String>,
}

impl JsonPath {
    pub(crate) fn parse(expr: &str) -> Result<Self, WarehouseError> {
        let invalid = || WarehouseError::InvalidJsonPath(expr.to_string());
        let rest = expr.trim().strip_prefix('$').ok_or_else(invalid)?;
        let chars: Vec<char> = rest.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && chars[end] != '.' && chars[end] != '[' {
                        end += 1;
                    }
                    if end == start {
                        return Err(invalid());
                    }
                    segments.push(Segment::Key(chars[start..end].iter().collect()));
                    i = end;
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|c| *c == ']')
                        .map(|p| p + i)
                        .ok_or_else(invalid)?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    let inner = inner.trim();
                    let quoted = (inner.starts_with('\'') && inner.ends_with('\''))
                        || (inner.starts_with('"') && inner.ends_with('"'));
                    if quoted && inner.len() >= 2 {
                        segments.push(Segment::Key(inner[1..inner.len() - 1].to_string()));
                    } else {
                        let index = inner.parse::<usize>().map_err(|_| invalid())?;
                        segments.push(Segment::Index(index));
                    }
                    i = close + 1;
                }
                _ => return Err(invalid()),
            }
        }

        if segments.is_empty() {
            return Err(invalid());
        }
        Ok(Self { segments })
    }

    /// Resolve this path against a record. Missing keys yield `None`.
    pub(crate) fn select<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.get(key)?,
                Segment::Index(index) => current.get(*index)?,
            };
        }
        Some(current)
    }
}

/// Parse the content of a JSONPaths file: `{"jsonpaths": ["$['a']", ...]}`.
pub(crate) fn parse_jsonpaths_file(content: &str) -> Result<Vec<JsonPath>, WarehouseError> {
    let file: JsonPathsFile = serde_json::from_str(content)?;
    file.jsonpaths.iter().map(|p| JsonPath::parse(p)).collect()
}
