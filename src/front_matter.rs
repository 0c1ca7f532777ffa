//! YAML front-matter extraction.
//!
//! A document carries front-matter when its first line is `---`. The block
//! runs until the next `---` (or `...`) line and is parsed as a YAML
//! mapping; whatever follows is the body.
//!
//! A block with no closing fence is not treated as front-matter: the whole
//! text is the body and the data is empty. gray-matter instead reads
//! everything after an unclosed `---` as metadata.

use serde_yaml::{Mapping, Value};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter<'a> {
    /// Metadata keys and values. Empty when the document has none.
    pub data: Mapping,
    /// The document text after the front-matter block.
    pub body: &'a str,
}

/// Split `text` into front-matter data and body.
///
/// Never fails: a missing, unterminated or unparseable block yields an
/// empty mapping so callers can fall back to their defaults.
pub fn parse(text: &str) -> FrontMatter<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match split_block(text) {
        Some((block, body)) => FrontMatter {
            data: parse_block(block),
            body,
        },
        None => FrontMatter {
            data: Mapping::new(),
            body: text,
        },
    }
}

fn split_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

fn split_block(text: &str) -> Option<(&str, &str)> {
    let (first, rest) = split_line(text);
    if !is_fence(first) {
        return None;
    }

    let mut consumed = 0;
    let mut remaining = rest;
    while !remaining.is_empty() {
        let (line, next) = split_line(remaining);
        if is_fence(line) || line.trim_end() == "..." {
            return Some((&rest[..consumed], next));
        }
        consumed += remaining.len() - next.len();
        remaining = next;
    }

    None
}

fn parse_block(block: &str) -> Mapping {
    if block.trim().is_empty() {
        return Mapping::new();
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(data)) => data,
        // A block holding only comments.
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            warn!("front-matter is not a key/value mapping, ignoring it");
            Mapping::new()
        }
        Err(e) => {
            warn!(error = %e, "unparseable front-matter, ignoring it");
            Mapping::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(fm: &'a FrontMatter<'_>, key: &str) -> Option<&'a Value> {
        fm.data.get(key)
    }

    #[test]
    fn parses_mapping_and_body() {
        let fm = parse("---\ntitle: Outage Postmortem\ntags: [infra]\n---\n# Body\n");

        assert_eq!(
            get(&fm, "title"),
            Some(&Value::String("Outage Postmortem".into()))
        );
        assert!(matches!(get(&fm, "tags"), Some(Value::Sequence(s)) if s.len() == 1));
        assert_eq!(fm.body, "# Body\n");
    }

    #[test]
    fn no_front_matter() {
        let fm = parse("# Just a heading\n\ntext");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "# Just a heading\n\ntext");
    }

    #[test]
    fn empty_block() {
        let fm = parse("---\n---\nbody");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn unterminated_block_is_body() {
        let text = "---\ntitle: Never closed\n";
        let fm = parse(text);
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, text);
    }

    #[test]
    fn crlf_and_bom() {
        let fm = parse("\u{feff}---\r\nauthor: Bob\r\n---\r\nbody");
        assert_eq!(get(&fm, "author"), Some(&Value::String("Bob".into())));
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn dots_close_the_block() {
        let fm = parse("---\nauthor: Alice\n...\nrest");
        assert_eq!(get(&fm, "author"), Some(&Value::String("Alice".into())));
        assert_eq!(fm.body, "rest");
    }

    #[test]
    fn invalid_yaml_yields_empty_mapping() {
        let fm = parse("---\ntitle: [unclosed\n---\nbody");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn non_mapping_yaml_yields_empty_mapping() {
        let fm = parse("---\n- just\n- a list\n---\n");
        assert!(fm.data.is_empty());
    }

    #[test]
    fn comment_only_block() {
        let fm = parse("---\n# nothing here\n---\nbody");
        assert!(fm.data.is_empty());
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn dashes_later_in_document_are_not_front_matter() {
        let fm = parse("intro\n---\ntitle: nope\n---\n");
        assert!(fm.data.is_empty());
    }
}
