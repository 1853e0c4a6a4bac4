//! Trailing metadata lines
//!
//! An entry may end with an `id:` line followed by a `tags:` line. Both are
//! optional and positional: tags must be the very last line, and the id line
//! must be the last line once tags are removed. Stripping them here means the
//! heading scan only ever sees title, notes and sections.

use std::collections::BTreeSet;

const TAGS_PREFIX: &str = "tags:";
const ID_PREFIX: &str = "id:";

/// Result of stripping the trailing metadata lines from a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document lines left after the metadata lines were removed
    pub lines: Vec<String>,

    /// Identifier token from the `id:` line, if present
    pub id: Option<String>,

    /// Tags from the `tags:` line, de-duplicated and sorted
    pub tags: Vec<String>,
}

/// Splits a metadata value into tokens; commas and colons separate like whitespace
pub(crate) fn tokenize(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == ',' || c == ':' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Re-joins lines, trims the result and splits it again
fn renormalize(lines: &[String]) -> Vec<String> {
    lines
        .join("\n")
        .trim()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Parses a `tags:` line; the first token is the prefix itself
fn parse_tags(line: &str) -> Vec<String> {
    let tags: BTreeSet<String> = tokenize(line).skip(1).map(str::to_lowercase).collect();
    tags.into_iter().collect()
}

/// Parses an `id:` line; the identifier is the second token
fn parse_id(line: &str) -> Option<String> {
    tokenize(line).nth(1).map(str::to_string)
}

/// Strips the trailing `tags:` and `id:` lines from a document
///
/// The input is trimmed first. Lines that do not match leave the document
/// untouched, so text without metadata round-trips as-is.
pub fn strip_metadata(text: &str) -> Metadata {
    let mut lines: Vec<String> = text.trim().lines().map(str::to_string).collect();
    let mut tags = Vec::new();

    if lines
        .last()
        .is_some_and(|line| line.trim().starts_with(TAGS_PREFIX))
    {
        if let Some(line) = lines.pop() {
            tags = parse_tags(&line);
        }
    }

    let mut lines = renormalize(&lines);
    let mut id = None;

    if lines
        .last()
        .is_some_and(|line| line.trim().starts_with(ID_PREFIX))
    {
        if let Some(line) = lines.pop() {
            id = parse_id(&line);
        }
    }

    Metadata { lines, id, tags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_id() {
        let meta = strip_metadata("Title\n=====\nBody\nid: abc-1\ntags: Work, home:work\n");

        assert_eq!(meta.lines, vec!["Title", "=====", "Body"]);
        assert_eq!(meta.id.as_deref(), Some("abc-1"));
        assert_eq!(meta.tags, vec!["home", "work"]);
    }

    #[test]
    fn tags_without_id() {
        let meta = strip_metadata("Title\n=====\ntags: b a\n");

        assert_eq!(meta.lines, vec!["Title", "====="]);
        assert!(meta.id.is_none());
        assert_eq!(meta.tags, vec!["a", "b"]);
    }

    #[test]
    fn id_without_tags() {
        let meta = strip_metadata("Title\n=====\nid: xyz\n");

        assert_eq!(meta.lines, vec!["Title", "====="]);
        assert_eq!(meta.id.as_deref(), Some("xyz"));
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn id_must_be_last_after_tags() {
        let meta = strip_metadata("Title\n=====\nid: xyz\nBody\n");

        assert_eq!(meta.lines.len(), 4);
        assert!(meta.id.is_none());
    }

    #[test]
    fn blank_lines_between_id_and_tags_are_dropped() {
        let meta = strip_metadata("Title\n=====\nid: xyz\n\n\ntags: a\n");

        assert_eq!(meta.id.as_deref(), Some("xyz"));
        assert_eq!(meta.lines, vec!["Title", "====="]);
    }

    #[test]
    fn bare_id_line_has_no_token() {
        let meta = strip_metadata("Title\n=====\nid:\n");

        assert!(meta.id.is_none());
        assert_eq!(meta.lines, vec!["Title", "====="]);
    }

    #[test]
    fn empty_tag_line() {
        let meta = strip_metadata("Title\n=====\ntags:\n");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.lines, vec!["Title", "====="]);
    }

    #[test]
    fn plain_text_is_untouched() {
        let meta = strip_metadata("  just some text\nmore  ");
        assert_eq!(meta.lines, vec!["just some text", "more"]);
        assert!(meta.id.is_none());
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn tokenize_splits_on_separators() {
        let tokens: Vec<_> = tokenize("a,b:c  d").collect();
        assert_eq!(tokens, vec!["a", "b", "c", "d"]);
    }
}
