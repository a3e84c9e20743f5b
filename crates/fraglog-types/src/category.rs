use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Character that introduces a markdown heading.
pub const HEADING_MARKER: char = '#';

/// Heading depth of category headings inside a fragment body (`# Added`).
pub const FRAGMENT_GRANULARITY: usize = 1;

/// Heading depth of category headings inside a changelog section (`### Added`).
pub const DOCUMENT_GRANULARITY: usize = 3;

/// One of the three fixed change types.
///
/// The declaration order is the canonical order in which categories appear
/// in a version section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Added,
    Changed,
    Fixed,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 3] = [Category::Added, Category::Changed, Category::Fixed];

    /// The heading label used in fragments and changelogs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Fixed => "Fixed",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Added => 0,
            Self::Changed => 1,
            Self::Fixed => 2,
        }
    }

    /// Match a heading label, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not one of the three categories.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| TypeError::UnknownCategory(s.to_string()))
    }
}
