//! Rust library to extract plain text and HTML bodies from raw MIME
//! message bodies.
//!
//! Given a body and its `Content-Type` header, the
//! [`MultipartBodyExtractor`] returns an [`ExtractedBody`] holding at
//! most one plain text and one HTML representation:
//!
//! - `text/plain` bodies keep their line breaks, markup is stripped
//! and long lines are wrapped;
//! - `text/html` bodies are kept, and a plain text version is derived
//! from them;
//! - `multipart/alternative` bodies are split at their boundary;
//! - `multipart/mixed` bodies are split as well, descending into
//! nested `multipart/alternative` parts and decoding base64 parts;
//! - any other content type is sent as plain text, and reported as an
//! [`ExtractWarning`].
//!
//! ```
//! let extracted = mime_body::extract("text/html", "<p>Hello</p>");
//! assert_eq!(extracted.html.as_deref(), Some("<p>Hello</p>"));
//! assert_eq!(extracted.plain_text.as_deref(), Some("Hello"));
//! ```

pub mod boundary;
pub mod content_type;
pub mod extractor;
pub mod header;
pub mod part;
pub mod sniff;
pub mod text;

#[doc(inline)]
pub use self::{
    boundary::{find_boundary, split_parts},
    content_type::{ContentType, MimeType},
    extractor::{extract, ExtractWarning, ExtractedBody, MultipartBodyExtractor},
    header::strip_headers,
    part::{ContentKind, ContentPart, TransferEncoding},
    sniff::sniff_kind,
    text::{html_to_text, strip_markup, wrap_mail, DEFAULT_LINE_WIDTH},
};
