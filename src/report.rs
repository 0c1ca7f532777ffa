use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// A fully-populated report record.
///
/// Every field has a value: missing or malformed front-matter fields are
/// replaced by their defaults when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub description: String,
    /// ISO-8601 date as written in the source. Not validated.
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub slug: String,
}

impl Report {
    /// Build a report from a file name and its front-matter data.
    ///
    /// `ingested_at` is the date used when the file does not carry one.
    pub fn from_front_matter(
        file_name: &str,
        data: &Mapping,
        ingested_at: &str,
    ) -> Self {
        Self {
            title: text_field(data, "title")
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: text_field(data, "description").unwrap_or_default(),
            date: text_field(data, "date")
                .unwrap_or_else(|| ingested_at.to_string()),
            author: text_field(data, "author")
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tags: tag_list(data),
            slug: slug_from_file_name(file_name),
        }
    }
}

/// Derive a slug by dropping one trailing `.md` from the file name.
pub fn slug_from_file_name(file_name: &str) -> String {
    file_name
        .strip_suffix(".md")
        .unwrap_or(file_name)
        .to_string()
}

fn text_field(data: &Mapping, key: &str) -> Option<String> {
    data.get(key).and_then(scalar_text)
}

/// Text for a single-valued field. Empty strings, `null`, `false` and
/// collections count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn tag_list(data: &Mapping) -> Vec<String> {
    match data.get("tags") {
        Some(Value::Sequence(items)) => items.iter().filter_map(tag_text).collect(),
        _ => Vec::new(),
    }
}

fn tag_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => tag_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
