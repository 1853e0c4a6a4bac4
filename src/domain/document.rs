//! Multi-entry documents
//!
//! A journal document is a run of entries back to back, delimited only by
//! their `=` title underlines. Splitting on those underlines leaves each
//! entry's title as the last line of the previous chunk, so the splitter
//! pairs titles and contents back up before handing each chunk to
//! [`Entry::from_markup`].

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use super::entry::{Entry, EntryError};

/// One or more `=` followed by a newline
static DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"=+\n").expect("divider pattern is valid"));

/// Divider re-inserted between a title and its content
const SYNTHETIC_DIVIDER: &str = "===";

/// Splits a document into single-entry chunks
///
/// Never fails. Blank input gives no chunks; input without any divider is
/// returned as a single chunk unchanged. Chunks are not validated here, so
/// a degenerate document yields chunks that fail to parse.
pub fn split_document(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let pieces: Vec<&str> = DIVIDER.split(text).collect();
    let Some((head, rest)) = pieces.split_first() else {
        return Vec::new();
    };
    let Some((last, middle)) = rest.split_last() else {
        return vec![text.to_string()];
    };

    // The first piece only contributes its first line: the first title
    let mut titles = vec![head.lines().next().unwrap_or_default()];
    let mut contents = Vec::with_capacity(rest.len());

    // Each middle piece closes the previous entry and opens the next one
    for piece in middle {
        let lines: Vec<&str> = piece.lines().collect();
        match lines.split_last() {
            Some((title, body)) => {
                contents.push(body.join("\n"));
                titles.push(*title);
            }
            None => {
                contents.push(String::new());
                titles.push("");
            }
        }
    }

    contents.push(last.lines().collect::<Vec<_>>().join("\n"));

    trace!("split document into {} chunks", titles.len());

    titles
        .into_iter()
        .zip(contents)
        .map(|(title, content)| [title, SYNTHETIC_DIVIDER, content.as_str()].join("\n"))
        .collect()
}

/// Parses every entry in a document, one result per chunk
///
/// Failures are reported per chunk so callers can skip bad entries.
pub fn parse_document_each(text: &str) -> impl Iterator<Item = Result<Entry, EntryError>> {
    split_document(text).into_iter().enumerate().map(|(index, chunk)| {
        Entry::from_markup(&chunk).inspect_err(|e| debug!("chunk {} rejected: {}", index, e))
    })
}

/// Parses every entry in a document, failing on the first bad chunk
///
/// Blank input yields no entries.
pub fn parse_document(text: &str) -> Result<Vec<Entry>, EntryError> {
    let entries = parse_document_each(text).collect::<Result<Vec<_>, _>>()?;
    debug!("parsed {} entries", entries.len());
    Ok(entries)
}
