//! # Text module
//!
//! Module dedicated to the plain text representation of bodies:
//! HTML to text conversion and mail line wrapping.
//!
//! Two conversions exist. HTML documents go through
//! [`html_to_text`], which lays the whole document out again.
//! Text that is already plain goes through [`strip_markup`], which
//! keeps its line structure and only converts the lines carrying
//! tags or entities.

use nanohtml2text::html2text;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum line width of plain text mail bodies.
pub const DEFAULT_LINE_WIDTH: usize = 77;

const QUOTE: char = '>';
const SPACE: char = ' ';

/// Matches a tag opening (`<p`, `</p`, `<!--`) or a character
/// reference (`&amp;`, `&#38;`). A lone `<` followed by a space is
/// not markup.
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[a-zA-Z/!]|&#?[a-zA-Z0-9]+;").unwrap());

/// Convert the given HTML document into plain text.
///
/// Tags are stripped, entities decoded and whitespace collapsed,
/// including line breaks that are not produced by block elements.
pub fn html_to_text(html: &str) -> String {
    html2text(html).trim().to_owned()
}

/// Strip markup from text that is already plain.
///
/// Line breaks, blank lines and spacing are kept. Lines containing
/// tags or entities are converted one by one; the text between a tag
/// opening and the next `>` is dropped, as any tag would be.
pub fn strip_markup(text: &str) -> String {
    let text = normalize_line_endings(text);

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if MARKUP.is_match(line) {
                html2text(line).trim().to_owned()
            } else {
                line.trim_end().to_owned()
            }
        })
        .collect();

    lines.join("\n").trim_start_matches('\n').trim_end().to_owned()
}

/// Wrap the given text so that lines do not exceed `width` columns.
///
/// Line endings are normalized to `\n`. Long lines are broken on the
/// last space that fits, and the spaces are kept at the end of the
/// broken line so that the break is a soft one (format=flowed).
/// Quoted lines repeat their `>` prefix on continuation lines. Words
/// longer than `width` are never split.
pub fn wrap_mail(text: &str, width: usize) -> String {
    normalize_line_endings(text)
        .split('\n')
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip markup then wrap, which is what plain text bodies go
/// through.
pub fn to_plain_text(text: &str, width: usize) -> String {
    wrap_mail(&strip_markup(text), width)
}

/// Convert then wrap, which is how plain text is derived from HTML
/// bodies.
pub fn html_to_plain_text(html: &str, width: usize) -> String {
    wrap_mail(&html_to_text(html), width)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split the given text into words, each with the spaces preceding
/// it. A trailing run of spaces comes as a gap with an empty word.
fn gaps_and_words(mut text: &str) -> Vec<(&str, &str)> {
    let mut tokens = Vec::new();

    while !text.is_empty() {
        let word_start = text.find(|c| c != SPACE).unwrap_or(text.len());
        let (gap, rest) = text.split_at(word_start);
        let word_end = rest.find(SPACE).unwrap_or(rest.len());
        let (word, rest) = rest.split_at(word_end);
        tokens.push((gap, word));
        text = rest;
    }

    tokens
}

fn wrap_line(line: &str, width: usize) -> String {
    if width == 0 || line.chars().count() <= width {
        return line.to_owned();
    }

    let quote_len = line.chars().take_while(|c| *c == QUOTE).count();
    let prefix = if quote_len > 0 && line[quote_len..].starts_with(SPACE) {
        &line[..quote_len + 1]
    } else {
        &line[..quote_len]
    };
    let prefix_len = prefix.chars().count();

    let mut wrapped = Vec::new();
    let mut current = String::from(prefix);
    let mut current_len = prefix_len;
    let mut first = true;

    for (gap, word) in gaps_and_words(&line[prefix.len()..]) {
        let gap_len = gap.chars().count();
        let word_len = word.chars().count();

        if first || word.is_empty() || current_len + gap_len + word_len <= width {
            current.push_str(gap);
            current.push_str(word);
            current_len += gap_len + word_len;
        } else {
            current.push_str(gap);
            wrapped.push(current);
            current = format!("{prefix}{word}");
            current_len = prefix_len + word_len;
        }

        first = false;
    }

    wrapped.push(current);
    wrapped.join("\n")
}

#[cfg(test)]
mod tests {
    use concat_with::concat_line;

    use super::{html_to_text, strip_markup, to_plain_text, wrap_mail, DEFAULT_LINE_WIDTH};

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(wrap_mail("Hi\r\nthere", DEFAULT_LINE_WIDTH), "Hi\nthere");
    }

    #[test]
    fn long_lines_are_soft_wrapped() {
        let line = "lorem ipsum ".repeat(20);
        let wrapped = wrap_mail(line.trim(), 30);

        let lines: Vec<&str> = wrapped.split('\n').collect();
        assert!(lines.len() > 1);
        for line in &lines[..lines.len() - 1] {
            assert!(line.ends_with(' '), "missing soft break: {line:?}");
            assert!(line.trim_end().chars().count() <= 30);
        }
        assert_eq!(wrapped.replace(" \n", " "), line.trim());
    }

    #[test]
    fn long_words_are_kept() {
        let word = "a".repeat(100);
        assert_eq!(wrap_mail(&word, 30), word);
    }

    #[test]
    fn quoted_lines_keep_their_prefix() {
        let wrapped = wrap_mail("> one two three four", 10);
        assert_eq!(wrapped, "> one two \n> three \n> four");
    }

    #[test]
    fn wrapping_keeps_spacing() {
        let line = "    one  two three";
        let wrapped = wrap_mail(line, 10);

        assert_eq!(wrapped, "    one  \ntwo three");
        assert_eq!(wrapped.replace('\n', ""), line);
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(html_to_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_to_text("<b>bold</b>"), "bold");
        assert_eq!(strip_markup("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(strip_markup("<b>bold</b> move"), "bold move");
    }

    #[test]
    fn plain_text_keeps_line_breaks() {
        let text = concat_line!(
            "",
            "Hello,",
            "",
            "Second paragraph.",
            "Line three.",
            "",
        );

        assert_eq!(
            to_plain_text(text, DEFAULT_LINE_WIDTH),
            "Hello,\n\nSecond paragraph.\nLine three."
        );
    }

    #[test]
    fn markup_is_stripped_line_by_line() {
        let text = "Dear <b>user</b>,\r\n\r\n  indented &amp; kept\r\nBye.";
        assert_eq!(strip_markup(text), "Dear user,\n\nindented & kept\nBye.");
    }

    #[test]
    fn lone_angle_brackets_are_not_tags() {
        let text = "if a < b and c > d then";
        assert_eq!(strip_markup(text), text);
    }

    #[test]
    fn angle_brackets_next_to_a_tag_are_dropped() {
        // A tag opening makes the whole line go through the HTML
        // conversion, which drops everything up to the next `>`.
        let text = strip_markup("if a <b and c > d then");
        assert!(text.starts_with("if a"));
        assert!(text.ends_with("d then"));
        assert!(!text.contains("and c"));
    }
}
