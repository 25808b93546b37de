//! # Boundary module
//!
//! Module dedicated to multipart boundaries: finding the boundary
//! token declared in a `Content-Type` value, and splitting a body
//! into the parts delimited by `--<boundary>` lines.

use tracing::{debug, trace};

use crate::content_type::{unquote, BOUNDARY};

const DELIMITER_PREFIX: &str = "--";

/// Find the boundary token declared somewhere in the given text.
///
/// Looks for the first `boundary=` occurrence (case-insensitive) and
/// returns the token that follows, without its wrapping quotes. An
/// unquoted token ends at the first `;` or whitespace.
pub fn find_boundary(text: &str) -> Option<&str> {
    let lowercase = text.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(pos) = lowercase[offset..].find(BOUNDARY) {
        let start = offset + pos + BOUNDARY.len();
        offset = start;

        let rest = text[start..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();

        let token = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let rest = &rest[1..];
                match rest.find(quote) {
                    Some(end) => &rest[..end],
                    None => rest.lines().next().unwrap_or_default(),
                }
            }
            _ => {
                let end = rest
                    .find(|c: char| c == ';' || c.is_whitespace())
                    .unwrap_or(rest.len());
                &rest[..end]
            }
        };

        let token = unquote(token);
        if token.is_empty() {
            debug!("empty boundary declared, skipping it");
            continue;
        }

        trace!(boundary = token, "found boundary");
        return Some(token);
    }

    None
}

/// Split the given body at `--<boundary>` delimiters.
///
/// The preamble before the first delimiter is discarded, as well as
/// everything from the closing `--<boundary>--` delimiter on, and any
/// empty or whitespace-only segment. Order is preserved. A body
/// without any delimiter gives no part at all.
pub fn split_parts<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    if boundary.is_empty() {
        debug!("cannot split body: empty boundary");
        return Vec::new();
    }

    let delimiter = format!("{DELIMITER_PREFIX}{boundary}");

    let parts: Vec<&str> = body
        .split(delimiter.as_str())
        .skip(1)
        .take_while(|segment| !segment.starts_with(DELIMITER_PREFIX))
        .filter(|segment| !segment.trim().is_empty())
        .collect();

    trace!(boundary, count = parts.len(), "split body into parts");
    parts
}

#[cfg(test)]
mod tests {
    use concat_with::concat_line;

    use super::{find_boundary, split_parts};

    #[test]
    fn find_quoted_boundary() {
        let text = "Content-Type: multipart/alternative; boundary=\"BBB\"\n\n--BBB";
        assert_eq!(find_boundary(text), Some("BBB"));
    }

    #[test]
    fn find_unquoted_boundary() {
        assert_eq!(find_boundary("multipart/mixed; BOUNDARY=abc;x=y"), Some("abc"));
        assert_eq!(find_boundary("multipart/mixed; boundary = abc\n"), Some("abc"));
    }

    #[test]
    fn find_boundary_skips_non_assignments() {
        let text = "no boundary here; boundary=\"real\"";
        assert_eq!(find_boundary(text), Some("real"));
        assert_eq!(find_boundary("nothing to see"), None);
        assert_eq!(find_boundary("boundary=\"\""), None);
    }

    #[test]
    fn split_discards_preamble_and_epilogue() {
        let body = concat_line!(
            "This is a preamble.",
            "--XYZ",
            "Content-Type: text/plain",
            "",
            "one",
            "--XYZ",
            "",
            "   ",
            "--XYZ",
            "Content-Type: text/html",
            "",
            "<p>two</p>",
            "--XYZ--",
            "epilogue",
        );

        let parts = split_parts(body, "XYZ");

        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("one"));
        assert!(parts[1].contains("<p>two</p>"));
    }

    #[test]
    fn split_without_delimiter() {
        assert!(split_parts("just a body", "XYZ").is_empty());
        assert!(split_parts("--XYZ\nbody", "").is_empty());
    }
}
