//! # Sniff module
//!
//! Loose detection of the MIME type of multipart parts.
//!
//! Parts are classified by the mere presence of `text/plain` or
//! `text/html` anywhere in their text rather than by parsing their
//! `Content-Type` header. This tolerates headers given in any order
//! or case, but a part whose content mentions one of these MIME types
//! can be misclassified. A stricter parser can replace
//! [`sniff_kind`] without touching the extractor.

use crate::{
    content_type::{MULTIPART_ALTERNATIVE, TEXT_HTML, TEXT_PLAIN},
    part::ContentKind,
};

/// Guess the kind of the given part, `text/plain` winning over
/// `text/html` when both appear.
pub fn sniff_kind(part: &str) -> Option<ContentKind> {
    if part.contains(TEXT_PLAIN) {
        Some(ContentKind::PlainText)
    } else if part.contains(TEXT_HTML) {
        Some(ContentKind::Html)
    } else {
        None
    }
}

/// Whether the given part looks like a nested
/// `multipart/alternative` container.
pub fn sniff_alternative(part: &str) -> bool {
    part.contains(MULTIPART_ALTERNATIVE)
}
