//! Error types for MIME decoding.
//!
//! Only configuration returns these directly. Inside the rendering pipeline
//! they are the reason attached to a
//! [`DecodeOutcome::Fallback`](crate::DecodeOutcome).

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Decoded bytes are not valid in the configured text encoding.
    #[error("Decoded bytes are not valid {charset}")]
    Charset {
        /// Name of the text encoding that rejected the bytes.
        charset: &'static str,
    },

    /// Unknown character set label.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),
}
