//! Transfer encoding decoding.
//!
//! Supports Base64 and Quoted-Printable bodies (RFC 2045) plus RFC 2047
//! encoded words in header values. Body decoding never fails outward: a
//! malformed body resolves to a [`DecodeOutcome::Fallback`] carrying the
//! original text.

use std::fmt;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encoding_rs::Encoding;
use regex::{Captures, Regex};

use crate::config::RenderOptions;
use crate::error::{Error, Result};

/// Content transfer encodings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Binary (no encoding).
    Binary,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Unrecognized token, decoded as identity.
    Other(String),
}

impl TransferEncoding {
    /// Parses a transfer encoding name, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "7bit" => Self::SevenBit,
            "8bit" => Self::EightBit,
            "binary" => Self::Binary,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            _ => Self::Other(name),
        }
    }

    /// Decodes a body encoded with this transfer encoding.
    ///
    /// Identity encodings return the input unchanged. A Base64 body with
    /// invalid characters or misaligned padding is logged and returned
    /// undecoded; decoded bytes are reinterpreted leniently, so the charset
    /// never causes a fallback.
    #[must_use]
    pub fn decode(&self, body: &str, options: &RenderOptions) -> DecodeOutcome {
        let result = match self {
            Self::Base64 => {
                decode_base64(body).map(|bytes| options.decode_lossy(&bytes).into_owned())
            }
            Self::QuotedPrintable => Ok(decode_quoted_printable(body, options)),
            Self::SevenBit | Self::EightBit | Self::Binary | Self::Other(_) => {
                return DecodeOutcome::Decoded(body.to_string());
            }
        };

        match result {
            Ok(text) => DecodeOutcome::Decoded(text),
            Err(reason) => {
                tracing::warn!(
                    encoding = %self,
                    error = %reason,
                    "Failed to decode body, keeping undecoded text"
                );
                DecodeOutcome::Fallback {
                    original: body.to_string(),
                    reason,
                }
            }
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Binary => write!(f, "binary"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Result of a best-effort body decode.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// The body was decoded (or needed no decoding).
    Decoded(String),
    /// Decoding failed; the original text is kept.
    Fallback {
        /// The undecoded input.
        original: String,
        /// Why decoding failed.
        reason: Error,
    },
}

impl DecodeOutcome {
    /// Returns the resolved text, decoded or not.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Decoded(text) | Self::Fallback { original: text, .. } => text,
        }
    }

    /// Returns the resolved text without consuming the outcome.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Decoded(text) | Self::Fallback { original: text, .. } => text,
        }
    }

    /// Returns the failure reason if decoding fell back.
    #[must_use]
    pub const fn reason(&self) -> Option<&Error> {
        match self {
            Self::Decoded(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    /// Returns true if decoding fell back to the original text.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Decodes a body according to a transfer encoding name.
///
/// A missing or unrecognized encoding is treated as identity.
#[must_use]
pub fn decode(body: &str, encoding: Option<&str>, options: &RenderOptions) -> DecodeOutcome {
    encoding
        .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
        .decode(body, options)
}

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data, ignoring any whitespace (including line breaks).
///
/// # Errors
///
/// Returns an error on characters outside the standard alphabet or
/// misaligned padding.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// Soft line breaks are removed first, then every `=XX` escape becomes the
/// byte it names. Consecutive escaped bytes are reinterpreted together with
/// the configured text encoding, so multi-byte sequences survive. A run
/// that is not valid in that encoding maps each byte to one character
/// instead. An `=` not followed by two hex digits is kept literally.
#[must_use]
pub fn decode_quoted_printable(text: &str, options: &RenderOptions) -> String {
    let unfolded = text.replace("=\r\n", "").replace("=\n", "");

    let mut result = String::with_capacity(unfolded.len());
    let mut pending: Vec<u8> = Vec::new();
    let mut rest = unfolded.as_str();

    while let Some(idx) = rest.find('=') {
        let (literal, tail) = rest.split_at(idx);
        let after = &tail[1..];

        if !literal.is_empty() {
            flush_escaped(&mut pending, &mut result, options);
            result.push_str(literal);
        }

        if let Some(byte) = hex_byte(after) {
            pending.push(byte);
            rest = &after[2..];
        } else {
            flush_escaped(&mut pending, &mut result, options);
            result.push('=');
            rest = after;
        }
    }

    flush_escaped(&mut pending, &mut result, options);
    result.push_str(rest);
    result
}

/// Parses the two hex digits at the start of `s`.
fn hex_byte(s: &str) -> Option<u8> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let high = char::from(bytes[0]).to_digit(16)?;
    let low = char::from(bytes[1]).to_digit(16)?;
    u8::try_from((high << 4) | low).ok()
}

fn flush_escaped(pending: &mut Vec<u8>, out: &mut String, options: &RenderOptions) {
    if pending.is_empty() {
        return;
    }
    match options.decode_strict(pending) {
        Ok(text) => out.push_str(&text),
        Err(e) => {
            tracing::trace!(error = %e, "Mapping escaped bytes one to one");
            out.extend(pending.iter().copied().map(char::from));
        }
    }
    pending.clear();
}

#[allow(clippy::unwrap_used)]
static ENCODED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\?([^?\s]+)\?([BbQq])\?([^?\s]*)\?=").unwrap());

/// Decodes RFC 2047 encoded words inside a header value.
///
/// Whitespace between two adjacent encoded words is dropped. Words with an
/// unknown charset or a malformed payload are left verbatim.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    let mut previous_was_word = false;

    for caps in ENCODED_WORD.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let gap = &text[last_end..whole.start()];
        if !(previous_was_word && gap.chars().all(char::is_whitespace)) {
            result.push_str(gap);
        }

        match decode_encoded_word(&caps) {
            Ok(decoded) => {
                result.push_str(&decoded);
                previous_was_word = true;
            }
            Err(e) => {
                tracing::debug!(word = whole.as_str(), error = %e, "Leaving encoded word verbatim");
                result.push_str(whole.as_str());
                previous_was_word = false;
            }
        }
        last_end = whole.end();
    }

    result.push_str(&text[last_end..]);
    result
}

fn decode_encoded_word(caps: &Captures<'_>) -> Result<String> {
    let label = &caps[1];
    // RFC 2231 language suffix, e.g. "utf-8*en".
    let label = label.split_once('*').map_or(label, |(charset, _)| charset);
    let charset = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::UnknownCharset(label.to_string()))?;
    let options = RenderOptions::builder().charset(charset).build();

    let payload = &caps[3];
    if caps[2].eq_ignore_ascii_case("B") {
        let bytes = decode_base64(payload)?;
        Ok(options.decode_strict(&bytes)?.into_owned())
    } else {
        Ok(decode_quoted_printable(&payload.replace('_', " "), &options))
    }
}
