//! The canonical empty fragment written by `fraglog new`.

use crate::category::Category;
use crate::fragment::HEADER_MARKER;

/// Author value in a freshly created fragment.
pub const AUTHOR_PLACEHOLDER: &str = "<Your name>";

/// Render the empty fragment template.
///
/// ```
/// use fraglog_types::fragment_template;
///
/// let text = fragment_template(None);
/// assert!(text.starts_with("---\nauthor: <Your name>\n---\n"));
/// assert!(text.contains("# Fixed\n"));
/// ```
pub fn fragment_template(author: Option<&str>) -> String {
    let author = author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(AUTHOR_PLACEHOLDER);

    let mut out = format!("{HEADER_MARKER}\nauthor: {author}\n{HEADER_MARKER}\n");
    for category in Category::ALL {
        out.push_str(&format!("\n# {category}\n"));
    }
    out
}
