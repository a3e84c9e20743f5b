use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::template::AUTHOR_PLACEHOLDER;

/// Line that opens and closes a fragment's metadata header.
pub const HEADER_MARKER: &str = "---";

/// Key/value pairs from a fragment header. Keys are unique; the last
/// occurrence of a duplicated key wins.
pub type Metadata = BTreeMap<String, String>;

/// A pending change description parsed from one fragment file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Store identifier (the file name for directory stores).
    pub id: String,
    /// Header key/value pairs.
    pub metadata: Metadata,
    /// Text outside the header block.
    pub body: String,
}

impl Fragment {
    pub fn new(id: impl Into<String>, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata,
            body: body.into(),
        }
    }

    /// The `author` header value, if present.
    pub fn author(&self) -> Option<&str> {
        self.metadata.get("author").map(String::as_str)
    }

    /// Returns `true` if the author was left as the template placeholder.
    pub fn has_placeholder_author(&self) -> bool {
        self.author() == Some(AUTHOR_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn author_lookup() {
        let f = Fragment::new("a.md", meta(&[("author", "Jo")]), "");
        assert_eq!(f.author(), Some("Jo"));
        assert!(!f.has_placeholder_author());
    }

    #[test]
    fn placeholder_author_detected() {
        let f = Fragment::new("a.md", meta(&[("author", AUTHOR_PLACEHOLDER)]), "");
        assert!(f.has_placeholder_author());
    }

    #[test]
    fn missing_author() {
        let f = Fragment::new("a.md", Metadata::new(), "# Added\n");
        assert_eq!(f.author(), None);
        assert!(!f.has_placeholder_author());
    }
}
