//! Fragment header parsing.
//!
//! A fragment looks like:
//!
//! ```text
//! ---
//! author: Jane Doe
//! ---
//!
//! # Added
//! - something new
//! ```
//!
//! The first two lines consisting solely of `---` delimit the header. Every
//! other line belongs to the body, including later `---` lines.

use fraglog_types::{Fragment, Metadata, HEADER_MARKER};

use crate::error::{ParseError, ParseResult};

/// Split raw fragment text into its metadata and body.
///
/// The body is the text before the opening marker line concatenated with
/// the text after the closing marker line.
///
/// # Errors
///
/// [`ParseError::MalformedFragment`] if fewer than two marker lines exist,
/// or a non-blank header line is not a `key: value` pair.
pub fn parse_fragment(raw: &str) -> ParseResult<(Metadata, String)> {
    let mut markers = Vec::with_capacity(2);
    let mut offset = 0usize;
    for line in raw.split_inclusive('\n') {
        if line.trim() == HEADER_MARKER {
            markers.push(offset..offset + line.len());
            if markers.len() == 2 {
                break;
            }
        }
        offset += line.len();
    }

    let (open, close) = match markers.as_slice() {
        [open, close] => (open.clone(), close.clone()),
        [_] => return Err(ParseError::malformed("header block is not closed")),
        _ => return Err(ParseError::malformed("no header block found")),
    };

    let metadata = parse_metadata(&raw[open.end..close.start])?;

    let mut body = String::with_capacity(raw.len() - (close.end - open.start));
    body.push_str(&raw[..open.start]);
    body.push_str(&raw[close.end..]);

    Ok((metadata, body))
}

/// Parse a fragment and attach its store identifier.
pub fn parse_named(id: impl Into<String>, raw: &str) -> ParseResult<Fragment> {
    let (metadata, body) = parse_fragment(raw)?;
    Ok(Fragment::new(id, metadata, body))
}

fn parse_metadata(header: &str) -> ParseResult<Metadata> {
    let mut metadata = Metadata::new();

    for (n, line) in header.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| {
            ParseError::malformed(format!("header line {} has no ':' separator: {line:?}", n + 1))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::malformed(format!(
                "header line {} has an empty key",
                n + 1
            )));
        }
        metadata.insert(key.to_string(), value.trim().to_string());
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraglog_types::fragment_template;

    #[test]
    fn parses_header_and_body() {
        let raw = "---\nauthor: Jane Doe\nticket: ABC-12\n---\n\n# Added\n- thing\n";
        let (meta, body) = parse_fragment(raw).unwrap();
        assert_eq!(meta.get("author").map(String::as_str), Some("Jane Doe"));
        assert_eq!(meta.get("ticket").map(String::as_str), Some("ABC-12"));
        assert_eq!(body, "\n# Added\n- thing\n");
    }

    #[test]
    fn template_is_valid() {
        let (meta, body) = parse_fragment(&fragment_template(None)).unwrap();
        assert_eq!(meta.get("author").map(String::as_str), Some("<Your name>"));
        assert_eq!(body, "\n# Added\n\n# Changed\n\n# Fixed\n");
    }

    #[test]
    fn value_split_on_first_colon_only() {
        let raw = "---\nlink: https://example.com/pr/1\n---\n";
        let (meta, _) = parse_fragment(raw).unwrap();
        assert_eq!(
            meta.get("link").map(String::as_str),
            Some("https://example.com/pr/1")
        );
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let raw = "---\nauthor: first\nauthor: second\n---\n";
        let (meta, _) = parse_fragment(raw).unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("author").map(String::as_str), Some("second"));
    }

    #[test]
    fn text_before_header_is_kept_in_body() {
        let raw = "intro\n---\nauthor: x\n---\n# Fixed\n- y\n";
        let (_, body) = parse_fragment(raw).unwrap();
        assert_eq!(body, "intro\n# Fixed\n- y\n");
    }

    #[test]
    fn later_rules_stay_in_body() {
        let raw = "---\nauthor: x\n---\n# Added\n- a\n---\n- b\n";
        let (_, body) = parse_fragment(raw).unwrap();
        assert_eq!(body, "# Added\n- a\n---\n- b\n");
    }

    #[test]
    fn crlf_markers_are_recognized() {
        let raw = "---\r\nauthor: x\r\n---\r\n# Added\r\n";
        let (meta, body) = parse_fragment(raw).unwrap();
        assert_eq!(meta.get("author").map(String::as_str), Some("x"));
        assert_eq!(body, "# Added\r\n");
    }

    #[test]
    fn empty_header_gives_empty_metadata() {
        let (meta, body) = parse_fragment("---\n---\n# Added\n").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "# Added\n");
    }

    #[test]
    fn missing_header_is_malformed() {
        let err = parse_fragment("# Added\n- no header\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedFragment { .. }));
        assert!(err.to_string().contains("no header block"));
    }

    #[test]
    fn unclosed_header_is_malformed() {
        let err = parse_fragment("---\nauthor: x\n# Added\n").unwrap_err();
        assert!(err.to_string().contains("not closed"));
    }

    #[test]
    fn inline_dashes_are_not_markers() {
        let err = parse_fragment("a --- b --- c\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedFragment { .. }));
    }

    #[test]
    fn header_line_without_colon_is_malformed() {
        let err = parse_fragment("---\nauthor Jane\n---\n").unwrap_err();
        assert!(err.to_string().contains("no ':' separator"));
    }

    #[test]
    fn empty_key_is_malformed() {
        let err = parse_fragment("---\n: value\n---\n").unwrap_err();
        assert!(err.to_string().contains("empty key"));
    }

    #[test]
    fn parse_named_sets_id() {
        let frag = parse_named("AbCd1234.md", "---\nauthor: x\n---\n").unwrap();
        assert_eq!(frag.id, "AbCd1234.md");
        assert_eq!(frag.author(), Some("x"));
    }
}
