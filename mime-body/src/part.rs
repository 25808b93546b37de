//! # Content part module
//!
//! Module dedicated to the typed leaf parts extracted from multipart
//! bodies.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine,
};
use tracing::{debug, warn};

use crate::{
    header::{find_transfer_encoding, strip_headers},
    sniff::sniff_kind,
};

const ENCODING_BASE64: &str = "base64";

/// The normalized kind of a textual part.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ContentKind {
    PlainText,
    Html,
}

impl ContentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => crate::content_type::TEXT_PLAIN,
            Self::Html => crate::content_type::TEXT_HTML,
        }
    }
}

/// The transfer encoding of a part content.
///
/// Only base64 changes how content is read, any other declared
/// encoding is treated as [`TransferEncoding::None`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TransferEncoding {
    #[default]
    None,
    Base64,
}

impl TransferEncoding {
    /// Detect the transfer encoding declared in the headers of the
    /// given part.
    pub fn detect(part: &str) -> Self {
        match find_transfer_encoding(part) {
            Some(encoding) if encoding.eq_ignore_ascii_case(ENCODING_BASE64) => Self::Base64,
            _ => Self::None,
        }
    }
}

/// A textual unit found between two boundary delimiters, headers
/// already stripped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentPart {
    pub kind: ContentKind,
    pub encoding: TransferEncoding,
    pub raw_text: String,
}

impl ContentPart {
    pub fn new(kind: ContentKind, encoding: TransferEncoding, raw_text: impl ToString) -> Self {
        Self {
            kind,
            encoding,
            raw_text: raw_text.to_string(),
        }
    }

    /// Build a part out of the given raw segment.
    ///
    /// Returns `None` when the segment is neither sniffed as plain
    /// text nor as HTML.
    pub fn parse(segment: &str) -> Option<Self> {
        let Some(kind) = sniff_kind(segment) else {
            debug!("skipping part of unknown kind");
            return None;
        };

        let encoding = TransferEncoding::detect(segment);
        let raw_text = strip_headers(segment);

        Some(Self::new(kind, encoding, raw_text))
    }

    /// Get the content, decoded according to its transfer encoding.
    ///
    /// Undecodable base64 content is returned as it is.
    pub fn decoded_text(&self) -> String {
        match self.encoding {
            TransferEncoding::None => self.raw_text.clone(),
            TransferEncoding::Base64 => match decode_base64(&self.raw_text) {
                Some(text) => text,
                None => {
                    warn!(kind = ?self.kind, "cannot decode base64 part, keeping it as it is");
                    self.raw_text.clone()
                }
            },
        }
    }
}

fn decode_base64(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(&compact)
        .or_else(|_| STANDARD_NO_PAD.decode(compact.trim_end_matches('=')))
        .ok()?;

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{ContentKind, ContentPart, TransferEncoding};

    #[test]
    fn parse_base64_html_part() {
        let segment = "\nContent-Type: text/html; charset=utf-8\nContent-Transfer-Encoding: base64\n\n PGgxPkhlbGxvPC9oMT4=\n";
        let part = ContentPart::parse(segment).unwrap();

        assert_eq!(part.kind, ContentKind::Html);
        assert_eq!(part.encoding, TransferEncoding::Base64);
        assert_eq!(part.raw_text, "PGgxPkhlbGxvPC9oMT4=");
        assert_eq!(part.decoded_text(), "<h1>Hello</h1>");
    }

    #[test]
    fn base64_without_padding() {
        let part = ContentPart::new(ContentKind::Html, TransferEncoding::Base64, "PGI+aGk8L2I+");
        assert_eq!(part.decoded_text(), "<b>hi</b>");
        let part = ContentPart::new(ContentKind::Html, TransferEncoding::Base64, "aGk");
        assert_eq!(part.decoded_text(), "hi");
    }

    #[test]
    fn invalid_base64_is_kept() {
        let part = ContentPart::new(ContentKind::Html, TransferEncoding::Base64, "<p>not b64</p>");
        assert_eq!(part.decoded_text(), "<p>not b64</p>");
    }

    #[test]
    fn unknown_part_is_skipped() {
        assert_eq!(ContentPart::parse("Content-Type: image/png\n\niVBOR"), None);
    }
}
