//! # Content-Type module
//!
//! Module dedicated to the parsing of `Content-Type` header values
//! like `multipart/mixed; boundary="abc123"`.

use std::collections::HashMap;

use tracing::trace;

pub(crate) const TEXT_PLAIN: &str = "text/plain";
pub(crate) const TEXT_HTML: &str = "text/html";
pub(crate) const MULTIPART_ALTERNATIVE: &str = "multipart/alternative";
pub(crate) const MULTIPART_MIXED: &str = "multipart/mixed";
pub(crate) const BOUNDARY: &str = "boundary";

/// The top-level MIME type the extractor knows how to dispatch on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MimeType {
    TextPlain,
    TextHtml,
    MultipartAlternative,
    MultipartMixed,
    /// Any other MIME type, kept lower-cased as it was given.
    Other(String),
}

impl From<&str> for MimeType {
    fn from(mime_type: &str) -> Self {
        match mime_type {
            TEXT_PLAIN => Self::TextPlain,
            TEXT_HTML => Self::TextHtml,
            MULTIPART_ALTERNATIVE => Self::MultipartAlternative,
            MULTIPART_MIXED => Self::MultipartMixed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A parsed `Content-Type` header value.
///
/// The first `;`-separated token is the MIME type, the following ones
/// are `key=value` attributes. Segments without `=` are ignored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContentType {
    mime_type: String,
    attributes: HashMap<String, String>,
}

impl ContentType {
    /// Parse the given header value.
    ///
    /// Parsing never fails: an empty header gives an empty MIME type,
    /// which dispatches as [`MimeType::Other`].
    pub fn parse(header: impl AsRef<str>) -> Self {
        let mut segments = header.as_ref().split(';');

        let mime_type = segments
            .next()
            .map(|s| unquote(s).to_lowercase())
            .unwrap_or_default();

        let attributes = segments
            .filter_map(|segment| {
                let (key, val) = segment.split_once('=')?;
                let key = key.trim().to_lowercase();
                if key.is_empty() {
                    return None;
                }
                Some((key, unquote(val).to_owned()))
            })
            .collect();

        let ctype = Self {
            mime_type,
            attributes,
        };

        trace!(?ctype, "parsed content type");
        ctype
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn kind(&self) -> MimeType {
        MimeType::from(self.mime_type.as_str())
    }

    /// Get an attribute by its case-insensitive name.
    pub fn attribute(&self, name: impl AsRef<str>) -> Option<&str> {
        self.attributes
            .get(&name.as_ref().to_lowercase())
            .map(String::as_str)
    }

    /// Get the non-empty `boundary` attribute.
    pub fn boundary(&self) -> Option<&str> {
        self.attribute(BOUNDARY).filter(|b| !b.is_empty())
    }
}

/// Trim whitespace then one level of wrapping quotes.
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    s.trim()
}
