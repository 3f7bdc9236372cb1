//! Rendering configuration.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// Options shared by every stage of the rendering pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Text encoding used to reinterpret transfer-decoded bytes.
    pub charset: &'static Encoding,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { charset: UTF_8 }
    }
}

impl RenderOptions {
    /// Creates options with UTF-8 as the text encoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an options builder.
    #[must_use]
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    /// Reinterprets bytes as text, failing on any malformed sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Charset`] if the bytes are not valid in the
    /// configured encoding.
    pub fn decode_strict<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        self.charset
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(Error::Charset {
                charset: self.charset.name(),
            })
    }

    /// Reinterprets bytes as text, replacing malformed sequences.
    #[must_use]
    pub fn decode_lossy<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        self.charset.decode_without_bom_handling(bytes).0
    }
}

/// Builder for [`RenderOptions`].
#[derive(Debug, Clone)]
pub struct RenderOptionsBuilder {
    charset: &'static Encoding,
}

impl Default for RenderOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderOptionsBuilder {
    /// Creates a builder with UTF-8 as the text encoding.
    #[must_use]
    pub fn new() -> Self {
        Self { charset: UTF_8 }
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the text encoding from a WHATWG label such as `"utf-8"` or
    /// `"windows-1252"`.
    ///
    /// Labels follow the WHATWG Encoding Standard, so `"iso-8859-1"`
    /// resolves to windows-1252.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCharset`] if the label is not recognized.
    pub fn charset_label(mut self, label: &str) -> Result<Self> {
        self.charset = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownCharset(label.to_string()))?;
        Ok(self)
    }

    /// Builds the options.
    #[must_use]
    pub const fn build(self) -> RenderOptions {
        RenderOptions {
            charset: self.charset,
        }
    }
}
