//! # mailrender-mime
//!
//! Best-effort decoding of fetched mail messages into readable text.
//!
//! ## Features
//!
//! - **Header parsing**: Folded top-level headers and one-line part headers
//! - **Content info**: Normalized content type, transfer encoding, boundary
//! - **Transfer decoding**: Base64 and Quoted-Printable with graceful fallback
//! - **Multipart**: Splits parts plus one nested multipart level, preferring plain text
//! - **HTML fallback**: Tag stripping with whitespace collapsing
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailrender_mime::{Rendered, render_raw};
//!
//! let raw = b"Subject: Test\r\n\
//!             Content-Type: text/html\r\n\
//!             \r\n\
//!             <p>Hello, <b>World</b>!</p>";
//!
//! match render_raw(raw) {
//!     Rendered::Text(text) => println!("{text}"),
//!     other => println!("{other}"),
//! }
//! ```
//!
//! ### Structured input
//!
//! ```ignore
//! use std::collections::HashMap;
//! use mailrender_mime::{HeaderValue, Renderer, RenderOptions, StructuredMessage};
//!
//! let mut headers = HashMap::new();
//! headers.insert("Content-Type".to_string(), HeaderValue::from("text/plain"));
//! let message = StructuredMessage::new(headers, b"Hello".to_vec());
//!
//! let options = RenderOptions::builder().charset_label("windows-1252")?.build();
//! let text = Renderer::new(options).render_structured(&message).into_string();
//! ```
//!
//! Decoding never fails: malformed bodies are logged at `warn` level through
//! `tracing` and shown undecoded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod content_type;
mod error;
mod header;
mod render;

pub mod encoding;
pub mod multipart;
pub mod select;

pub use config::{RenderOptions, RenderOptionsBuilder};
pub use content_type::{ContentInfo, DEFAULT_CONTENT_TYPE, DEFAULT_ENCODING, extract};
pub use encoding::{DecodeOutcome, TransferEncoding, decode};
pub use error::{Error, Result};
pub use header::{HeaderMap, HeaderValue, parse_block, parse_simple};
pub use multipart::{Part, split, split_header_body};
pub use render::{
    NO_BODY, NO_READABLE_CONTENT, Rendered, Renderer, StructuredMessage, render_raw,
    render_structured,
};
pub use select::{select_final, strip_html};
