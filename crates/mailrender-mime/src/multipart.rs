//! Multipart body splitting.
//!
//! Parts directly under the given boundary are inspected, and a nested
//! `multipart/*` part is split one level further. Deeper nesting,
//! attachments and any other non-text parts are ignored.

use crate::config::RenderOptions;
use crate::content_type::ContentInfo;
use crate::header::{HeaderMap, parse_simple};
use crate::render::Rendered;
use crate::select::prefer_text;

/// A decoded MIME part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: HeaderMap,
    /// Content information derived from the part headers.
    pub info: ContentInfo,
    /// Transfer-decoded, trimmed body text.
    pub text: String,
}

/// Splits text into header block and body at the first blank line.
///
/// Both `\r\n\r\n` and a bare `\n\n` count; whichever comes first wins.
#[must_use]
pub fn split_header_body(text: &str) -> Option<(&str, &str)> {
    let crlf = text.find("\r\n\r\n").map(|idx| (idx, 4));
    let lf = text.find("\n\n").map(|idx| (idx, 2));

    let (idx, len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(found), None) | (None, Some(found)) => found,
        (None, None) => return None,
    };
    Some((&text[..idx], &text[idx + len..]))
}

/// Splits a multipart body into its decoded parts.
///
/// The preamble before the first delimiter, the closing `--` fragment and
/// any fragment without a blank line after its headers are skipped.
#[must_use]
pub fn parts(body: &str, boundary: &str, options: &RenderOptions) -> Vec<Part> {
    let delimiter = format!("--{boundary}");

    body.split(delimiter.as_str())
        .skip(1)
        .filter_map(|fragment| parse_part(fragment, options))
        .collect()
}

fn parse_part(fragment: &str, options: &RenderOptions) -> Option<Part> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        tracing::trace!("Skipping closing delimiter fragment");
        return None;
    }

    let Some((head, body)) = split_header_body(fragment) else {
        tracing::debug!("Skipping part without header separator");
        return None;
    };

    let headers = parse_simple(head);
    let info = ContentInfo::extract(&headers);
    let text = info
        .transfer_encoding()
        .decode(body, options)
        .into_string()
        .trim()
        .to_string();

    Some(Part {
        headers,
        info,
        text,
    })
}

/// Splits a multipart body and selects its displayable text.
///
/// The last `text/plain` part and the last `text/html` part are kept, in
/// document order across the top level and any nested multipart; plain text
/// is preferred, then HTML with tags stripped.
#[must_use]
pub fn split(body: &str, boundary: &str, options: &RenderOptions) -> Rendered {
    let mut text_content: Option<String> = None;
    let mut html_content: Option<String> = None;

    for part in parts(body, boundary, options) {
        if let Some(nested) = &part.info.boundary {
            tracing::debug!(boundary = %nested, "Splitting nested multipart");
            for nested_part in parts(&part.text, nested, options) {
                collect(nested_part, &mut text_content, &mut html_content);
            }
        } else {
            collect(part, &mut text_content, &mut html_content);
        }
    }

    prefer_text(text_content.as_deref(), html_content.as_deref())
}

fn collect(part: Part, text_content: &mut Option<String>, html_content: &mut Option<String>) {
    let content_type = part.info.content_type.as_str();
    if content_type.contains("text/plain") {
        *text_content = Some(part.text);
    } else if content_type.contains("text/html") {
        *html_content = Some(part.text);
    } else {
        tracing::trace!(content_type, "Ignoring non-text part");
    }
}
