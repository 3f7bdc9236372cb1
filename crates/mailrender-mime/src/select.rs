//! Final text selection and HTML stripping.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::Rendered;

#[allow(clippy::unwrap_used)]
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strips HTML tags and collapses whitespace.
///
/// Every `<...>` run is removed without regard for nesting, runs of
/// whitespace become a single space and the result is trimmed. Entities such
/// as `&amp;` are left as written.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let without_tags = HTML_TAG.replace_all(html, "");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the displayable form of a single-part body.
///
/// HTML content is stripped; anything else is returned unchanged.
#[must_use]
pub fn select_final(content_type: &str, decoded_body: &str) -> String {
    if content_type.contains("html") {
        strip_html(decoded_body)
    } else {
        decoded_body.to_string()
    }
}

/// Chooses between the plain-text and HTML renderings of a message.
///
/// Plain text wins when non-empty, then stripped HTML.
#[must_use]
pub fn prefer_text(text: Option<&str>, html: Option<&str>) -> Rendered {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return Rendered::Text(text.to_string());
    }

    html.map(strip_html)
        .filter(|stripped| !stripped.is_empty())
        .map_or(Rendered::NoReadableContent, Rendered::Text)
}
