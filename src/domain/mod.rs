//! Domain models for journal entries
//!
//! Contains the parsing, normalization and rendering logic without any I/O
//! concerns. Storage and uniqueness of IDs across a collection belong to the
//! caller.

mod document;
mod entry;
mod heading;
mod id;
mod metadata;

pub use document::{parse_document, parse_document_each, split_document};
pub use entry::{is_reserved, Entry, EntryError, EntryRecord, RenderOptions, NOTES, RESERVED_HEADINGS};
pub use heading::{is_underline, scan as scan_headings, Outline};
pub use id::{EntryId, IdError};
pub use metadata::{strip_metadata, Metadata};
