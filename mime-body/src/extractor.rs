//! # Multipart body extractor module
//!
//! Module dedicated to the extraction of the plain text and HTML
//! representations of a raw message body, given its `Content-Type`
//! header.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    boundary::{find_boundary, split_parts},
    content_type::{ContentType, MimeType, MULTIPART_ALTERNATIVE, MULTIPART_MIXED},
    header::strip_headers,
    part::{ContentKind, ContentPart},
    sniff::sniff_alternative,
    text::{html_to_plain_text, to_plain_text, DEFAULT_LINE_WIDTH},
};

/// Non-fatal conditions met during extraction.
///
/// None of them aborts the extraction: they are reported next to the
/// extracted body so that callers can warn users or log them.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ExtractWarning {
    #[error("content type {0} is not supported, body will be sent as plain text")]
    UnsupportedContentType(String),
    #[error("cannot find {0} parts: missing or unmatched boundary")]
    MalformedBoundary(String),
}

/// The plain text and HTML representations of a body.
///
/// At most one value per kind is kept: when several parts share the
/// same kind, the last one wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct ExtractedBody {
    pub plain_text: Option<String>,
    pub html: Option<String>,
    #[cfg_attr(feature = "derive", serde(skip))]
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractedBody {
    pub fn get(&self, kind: ContentKind) -> Option<&str> {
        match kind {
            ContentKind::PlainText => self.plain_text.as_deref(),
            ContentKind::Html => self.html.as_deref(),
        }
    }

    /// Whether the content type was recognized.
    pub fn is_supported(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, ExtractWarning::UnsupportedContentType(_)))
    }

    /// Iterate over the extracted contents, plain text first.
    pub fn contents(&self) -> impl Iterator<Item = (ContentKind, &str)> {
        [ContentKind::PlainText, ContentKind::Html]
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|text| (kind, text)))
    }
}

/// The multipart nesting level being walked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Container {
    Alternative,
    Mixed,
}

impl Container {
    fn mime_type(&self) -> &'static str {
        match self {
            Self::Alternative => MULTIPART_ALTERNATIVE,
            Self::Mixed => MULTIPART_MIXED,
        }
    }
}

/// Raw body → plain text and HTML extractor.
///
/// Handles `text/plain`, `text/html`, `multipart/alternative` and
/// `multipart/mixed` bodies, the latter possibly wrapping a
/// `multipart/alternative` one. Any other content type is rendered
/// as plain text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultipartBodyExtractor {
    /// Maximum width of plain text lines.
    line_width: usize,
}

impl Default for MultipartBodyExtractor {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl MultipartBodyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Extract the plain text and HTML representations of the given
    /// body, according to the given `Content-Type` header value.
    pub fn extract(&self, content_type: impl AsRef<str>, body: impl AsRef<str>) -> ExtractedBody {
        let header = content_type.as_ref();
        let body = body.as_ref();
        let ctype = ContentType::parse(header);
        let mut extracted = ExtractedBody::default();

        match ctype.kind() {
            MimeType::TextPlain => {
                extracted.plain_text = Some(self.plain_text(body));
            }
            MimeType::TextHtml => {
                extracted.html = Some(body.to_owned());
                extracted.plain_text = Some(html_to_plain_text(body, self.line_width));
            }
            MimeType::MultipartAlternative => {
                let boundary = ctype.boundary().or_else(|| find_boundary(body));
                self.extract_multipart(Container::Alternative, body, boundary, &mut extracted);
            }
            MimeType::MultipartMixed => {
                let boundary = ctype.boundary().or_else(|| find_boundary(header));
                self.extract_multipart(Container::Mixed, body, boundary, &mut extracted);
            }
            MimeType::Other(mime_type) => {
                warn!(%mime_type, "unsupported content type, sending body as plain text");
                extracted.plain_text = Some(self.plain_text(body));
                let warning = ExtractWarning::UnsupportedContentType(header.trim().to_owned());
                extracted.warnings.push(warning);
            }
        }

        extracted
    }

    fn plain_text(&self, text: &str) -> String {
        to_plain_text(text, self.line_width)
    }

    fn extract_multipart(
        &self,
        container: Container,
        body: &str,
        boundary: Option<&str>,
        extracted: &mut ExtractedBody,
    ) {
        let Some(parts) = collect_parts(container, body, boundary) else {
            debug!(container = container.mime_type(), "no part found, falling back to raw body");
            extracted.plain_text = Some(self.plain_text(body));
            let warning = ExtractWarning::MalformedBoundary(container.mime_type().to_owned());
            extracted.warnings.push(warning);
            return;
        };

        debug!(count = parts.len(), "extracted content parts");

        for part in parts {
            let text = part.decoded_text();
            match part.kind {
                ContentKind::PlainText => {
                    extracted.plain_text = Some(self.plain_text(&text));
                }
                ContentKind::Html => {
                    extracted.html = Some(text);
                }
            }
        }
    }
}

/// Walk the parts of the given multipart body.
///
/// A `multipart/mixed` container descends into nested
/// `multipart/alternative` parts; an alternative container only has
/// leaves. Returns `None` when the boundary is missing or never
/// delimits anything.
fn collect_parts(
    container: Container,
    body: &str,
    boundary: Option<&str>,
) -> Option<Vec<ContentPart>> {
    let Some(boundary) = boundary else {
        debug!(container = container.mime_type(), "missing boundary");
        return None;
    };

    let segments = split_parts(body, boundary);
    if segments.is_empty() {
        debug!(container = container.mime_type(), boundary, "unmatched boundary");
        return None;
    }

    let mut parts = Vec::new();

    for segment in segments {
        if container == Container::Mixed && sniff_alternative(segment) {
            let inner_boundary = find_boundary(segment);
            let inner_body = strip_headers(segment);
            match collect_parts(Container::Alternative, &inner_body, inner_boundary) {
                Some(inner_parts) => parts.extend(inner_parts),
                None => debug!("skipping nested alternative part without parts"),
            }
        } else {
            parts.extend(ContentPart::parse(segment));
        }
    }

    Some(parts)
}

/// Extract bodies using the default [`MultipartBodyExtractor`].
pub fn extract(content_type: impl AsRef<str>, body: impl AsRef<str>) -> ExtractedBody {
    MultipartBodyExtractor::default().extract(content_type, body)
}
