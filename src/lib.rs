//! Daily journal entries
//!
//! Parses an underline-heading markup into journal entries (a title, named
//! sections and tags) and renders entries back to that markup. Documents
//! holding several entries back to back are split and parsed per entry.

pub mod config;
pub mod domain;

pub use config::{Config, ConfigError};
pub use domain::{parse_document, Entry, EntryError, EntryId, EntryRecord, RenderOptions};
