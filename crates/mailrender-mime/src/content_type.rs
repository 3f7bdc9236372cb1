//! Content type and transfer encoding extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::encoding::TransferEncoding;
use crate::header::HeaderMap;

/// Content type assumed when none is declared.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Transfer encoding assumed when none is declared.
pub const DEFAULT_ENCODING: &str = "7bit";

#[allow(clippy::unwrap_used)]
static BOUNDARY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|[;\s])boundary\s*=\s*(?:"([^"]*)"|([^;\s]+))"#).unwrap()
});

/// Normalized content information for a message or part.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentInfo {
    /// Lower-cased `type/subtype`, never empty.
    pub content_type: String,
    /// Lower-cased transfer encoding token.
    pub encoding: String,
    /// Multipart boundary, only set for `multipart/*` content.
    pub boundary: Option<String>,
}

impl Default for ContentInfo {
    fn default() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            boundary: None,
        }
    }
}

impl ContentInfo {
    /// Derives content information from headers.
    ///
    /// Missing or malformed headers fall back to `text/plain`, `7bit` and no
    /// boundary.
    #[must_use]
    pub fn extract(headers: &HeaderMap) -> Self {
        let mut info = Self::default();

        if let Some(value) = headers.get_ignore_case("Content-Type") {
            if let Some(content_type) = media_type(value) {
                info.content_type = content_type;
            }
            if info.is_multipart() {
                info.boundary = boundary_param(value);
            }
        }

        if let Some(value) = headers.get_ignore_case("Content-Transfer-Encoding") {
            let encoding = value.trim();
            if !encoding.is_empty() {
                info.encoding = encoding.to_ascii_lowercase();
            }
        }

        info
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type.starts_with("multipart/")
    }

    /// Returns the parsed transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        TransferEncoding::parse(&self.encoding)
    }
}

/// Derives content information from headers.
#[must_use]
pub fn extract(headers: &HeaderMap) -> ContentInfo {
    ContentInfo::extract(headers)
}

/// Returns the lower-cased media type before any parameters, or `None` if
/// it is not of the form `type/subtype`.
fn media_type(value: &str) -> Option<String> {
    let media = value.split(';').next().unwrap_or_default().trim();
    let (main, sub) = media.split_once('/')?;
    if main.trim().is_empty() || sub.trim().is_empty() {
        return None;
    }
    Some(media.to_ascii_lowercase())
}

fn boundary_param(value: &str) -> Option<String> {
    let caps = BOUNDARY_PARAM.captures(value)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}
