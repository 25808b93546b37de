//! # Part header module
//!
//! Module dedicated to the MIME headers found at the top of a
//! multipart body part.

use tracing::trace;

/// Headers removed from the top of a part (RFC 2045).
pub(crate) const KNOWN_HEADERS: [&str; 4] = [
    "Content-Type",
    "Content-Transfer-Encoding",
    "Content-ID",
    "Content-Disposition",
];

pub(crate) const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

const CONTINUATION_INDENT: &str = "    ";

/// Strip the known MIME headers from the top of the given part.
///
/// Leading lines starting with a known header name followed by `:`
/// are removed until the first line that is not a header. A header
/// line ending with `;` is folded with the next line when that line
/// starts with four spaces (or a tab), and both are removed. The
/// remaining content is returned trimmed, which makes stripping an
/// already stripped part a no-op.
pub fn strip_headers(part: &str) -> String {
    let mut lines = part.trim().split('\n').peekable();
    let mut stripped = 0;

    while let Some(line) = lines.peek() {
        if !is_known_header(line.trim_end()) {
            break;
        }

        let mut line = lines.next().unwrap_or_default().trim_end();
        stripped += 1;

        while line.ends_with(';') {
            match lines.peek() {
                Some(next) if is_continuation(next) => {
                    line = lines.next().unwrap_or_default().trim_end();
                    stripped += 1;
                }
                _ => break,
            }
        }
    }

    trace!(lines = stripped, "stripped part headers");
    lines.collect::<Vec<_>>().join("\n").trim().to_owned()
}

/// Find the value of the first `Content-Transfer-Encoding` header
/// declared in the given part, if any.
pub fn find_transfer_encoding(part: &str) -> Option<&str> {
    let lowercase = part.to_ascii_lowercase();
    let start = lowercase.find(CONTENT_TRANSFER_ENCODING)? + CONTENT_TRANSFER_ENCODING.len();
    let rest = part[start..].trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix(':')?;
    let value = rest.lines().next().unwrap_or_default().trim();
    let value = value.trim_end_matches(';').trim();

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_known_header(line: &str) -> bool {
    KNOWN_HEADERS.iter().any(|name| {
        line.len() > name.len()
            && line.is_char_boundary(name.len())
            && line[..name.len()].eq_ignore_ascii_case(name)
            && line[name.len()..].starts_with(':')
    })
}

fn is_continuation(line: &str) -> bool {
    line.starts_with(CONTINUATION_INDENT) || line.starts_with('\t')
}

#[cfg(test)]
mod tests {
    use concat_with::concat_line;

    use super::{find_transfer_encoding, strip_headers};

    #[test]
    fn strip_simple_headers() {
        let part = concat_line!(
            "",
            "Content-Type: text/plain; charset=utf-8",
            "Content-Transfer-Encoding: 7bit",
            "",
            "Hello,",
            "world!",
            "",
        );

        assert_eq!(strip_headers(part), "Hello,\nworld!");
    }

    #[test]
    fn strip_folded_header() {
        let part = concat_line!(
            "Content-Type: multipart/alternative;",
            "    boundary=\"BBB\"",
            "Content-ID: <id@localhost>",
            "",
            "--BBB",
        );

        assert_eq!(strip_headers(part), "--BBB");
    }

    #[test]
    fn strip_stops_at_unknown_header() {
        let part = concat_line!(
            "Content-Type: text/html",
            "X-Custom: value",
            "Content-Disposition: inline",
            "",
            "<p>body</p>",
        );

        assert_eq!(
            strip_headers(part),
            "X-Custom: value\nContent-Disposition: inline\n\n<p>body</p>",
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let part = "Content-Type: text/plain\r\n\r\nHi there\r\n";
        let once = strip_headers(part);
        assert_eq!(once, "Hi there");
        assert_eq!(strip_headers(&once), once);
    }

    #[test]
    fn strip_keeps_content_looking_like_prose() {
        let part = "Content types are fun: really.";
        assert_eq!(strip_headers(part), part);
    }

    #[test]
    fn transfer_encoding() {
        let part = "Content-Type: text/html\nContent-Transfer-Encoding: BASE64\n\nPGgx";
        assert_eq!(find_transfer_encoding(part), Some("BASE64"));
        assert_eq!(find_transfer_encoding("Content-Type: text/html\n\nhi"), None);
        assert_eq!(find_transfer_encoding("content-transfer-encoding:\n"), None);
    }
}
