//! Message rendering.
//!
//! A [`Renderer`] turns either a raw message or a pre-parsed one into the
//! best available plain text:
//!
//! 1. Split the raw message at the first blank line (raw input only).
//! 2. Parse the headers and derive the [`ContentInfo`].
//! 3. Multipart bodies with a boundary go through [`split`]; anything else
//!    is transfer-decoded and, for HTML, stripped of tags.

use std::collections::HashMap;
use std::fmt;

use crate::config::RenderOptions;
use crate::content_type::ContentInfo;
use crate::header::{HeaderMap, HeaderValue, parse_block};
use crate::multipart::{split, split_header_body};
use crate::select::select_final;

/// Shown when a message has no text or HTML content.
pub const NO_READABLE_CONTENT: &str = "(no readable content)";

/// Shown when a raw message has no blank line between headers and body.
pub const NO_BODY: &str = "(could not extract message body)";

/// Outcome of rendering a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Displayable text.
    Text(String),
    /// No text or HTML content was found.
    NoReadableContent,
    /// The raw message could not be split into headers and body.
    NoBody,
}

impl Rendered {
    /// Returns the rendered text, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoReadableContent | Self::NoBody => None,
        }
    }

    /// Returns the rendered text, or the sentinel for the outcome.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::NoReadableContent => f.write_str(NO_READABLE_CONTENT),
            Self::NoBody => f.write_str(NO_BODY),
        }
    }
}

/// A message already split by a mail-retrieval client.
#[derive(Debug, Clone, Default)]
pub struct StructuredMessage {
    /// Headers as reported by the client.
    pub headers: HashMap<String, HeaderValue>,
    /// Bytes of the message's text section.
    pub text: Vec<u8>,
}

impl StructuredMessage {
    /// Creates a structured message.
    #[must_use]
    pub const fn new(headers: HashMap<String, HeaderValue>, text: Vec<u8>) -> Self {
        Self { headers, text }
    }
}

/// Renders messages to plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Returns the renderer's options.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders an entire raw message (headers, blank line, body).
    ///
    /// Returns [`Rendered::NoBody`] if there is no blank line separating
    /// headers from body.
    #[must_use]
    pub fn render_raw(&self, raw: &[u8]) -> Rendered {
        let message = self.options.decode_lossy(raw);
        let Some((head, body)) = split_header_body(&message) else {
            tracing::debug!(len = raw.len(), "No header/body separator in raw message");
            return Rendered::NoBody;
        };

        let headers = parse_block(head);
        self.render_text(&headers, body)
    }

    /// Renders a message supplied as protocol headers plus text section.
    #[must_use]
    pub fn render_structured(&self, message: &StructuredMessage) -> Rendered {
        let headers = HeaderMap::from_structured(&message.headers);
        self.render(&headers, &message.text)
    }

    /// Renders a body using already parsed headers.
    #[must_use]
    pub fn render(&self, headers: &HeaderMap, body: &[u8]) -> Rendered {
        let body = self.options.decode_lossy(body);
        self.render_text(headers, &body)
    }

    fn render_text(&self, headers: &HeaderMap, body: &str) -> Rendered {
        let info = ContentInfo::extract(headers);

        if let Some(boundary) = info.boundary.as_deref() {
            tracing::debug!(
                content_type = %info.content_type,
                boundary,
                "Rendering multipart body"
            );
            return split(body, boundary, &self.options);
        }

        let decoded = info
            .transfer_encoding()
            .decode(body, &self.options)
            .into_string();
        let text = select_final(&info.content_type, &decoded);

        if text.trim().is_empty() {
            Rendered::NoReadableContent
        } else {
            Rendered::Text(text)
        }
    }
}

/// Renders a raw message with default options.
#[must_use]
pub fn render_raw(raw: &[u8]) -> Rendered {
    Renderer::default().render_raw(raw)
}

/// Renders a structured message with default options.
#[must_use]
pub fn render_structured(message: &StructuredMessage) -> Rendered {
    Renderer::default().render_structured(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_raw_plain() {
        let raw = b"From: a@example.com\r\nSubject: Hi\r\n\r\nHello, World!";
        assert_eq!(render_raw(raw), Rendered::Text("Hello, World!".to_string()));
    }

    #[test]
    fn test_render_raw_without_separator() {
        let raw = b"From: a@example.com\r\nSubject: no body here";
        let rendered = render_raw(raw);
        assert_eq!(rendered, Rendered::NoBody);
        assert_eq!(rendered.as_text(), None);
        assert_eq!(rendered.to_string(), NO_BODY);
    }

    #[test]
    fn test_render_raw_folded_content_type() {
        let raw = concat!(
            "Content-Type: multipart/alternative;\r\n",
            "\tboundary=\"folded\"\r\n",
            "\r\n",
            "--folded\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "from the folded boundary\r\n",
            "--folded--\r\n",
        );
        assert_eq!(
            render_raw(raw.as_bytes()),
            Rendered::Text("from the folded boundary".to_string())
        );
    }

    #[test]
    fn test_render_single_part_html() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/html; charset=utf-8");
        let rendered = Renderer::default().render(&headers, b"<h1>Title</h1>\r\n<p>Body</p>");
        assert_eq!(rendered, Rendered::Text("Title Body".to_string()));
    }

    #[test]
    fn test_render_single_part_base64() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Transfer-Encoding", "base64");
        let rendered = Renderer::default().render(&headers, b"SGVsbG8sIFdvcmxkIQ==\r\n");
        assert_eq!(rendered.as_text(), Some("Hello, World!"));
    }

    #[test]
    fn test_render_single_part_keeps_plain_text_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");
        let rendered = Renderer::default().render(&headers, b"  indented\r\n\r\nlines\r\n");
        assert_eq!(rendered.as_text(), Some("  indented\r\n\r\nlines\r\n"));
    }

    #[test]
    fn test_render_empty_body() {
        let raw = b"Subject: empty\r\n\r\n";
        let rendered = render_raw(raw);
        assert_eq!(rendered, Rendered::NoReadableContent);
        assert_eq!(rendered.into_string(), NO_READABLE_CONTENT);
    }

    #[test]
    fn test_render_multipart_without_boundary_is_single_part() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "multipart/mixed");
        let rendered = Renderer::default().render(&headers, b"raw multipart text");
        assert_eq!(rendered.as_text(), Some("raw multipart text"));
    }

    #[test]
    fn test_render_structured() {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            HeaderValue::from(vec![
                "text/html".to_string(),
                "text/plain".to_string(),
            ]),
        );
        headers.insert(
            "Content-Transfer-Encoding".to_string(),
            HeaderValue::from("quoted-printable"),
        );
        let message = StructuredMessage::new(headers, b"<p>caf=C3=A9</p>".to_vec());

        assert_eq!(
            render_structured(&message),
            Rendered::Text("café".to_string())
        );
    }

    #[test]
    fn test_renderer_uses_configured_charset() {
        let options = RenderOptions::builder()
            .charset_label("windows-1252")
            .unwrap()
            .build();
        let renderer = Renderer::new(options);
        let raw = b"Content-Transfer-Encoding: quoted-printable\r\n\r\nna=EFve";
        assert_eq!(renderer.render_raw(raw).as_text(), Some("naïve"));
        assert_eq!(renderer.options().charset.name(), "windows-1252");
    }
}
