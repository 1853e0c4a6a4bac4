//! Entry identifiers
//!
//! ID Format: `{hash}-{Y}-{M}-{D}_{h}-{m}-{s}-{micro}`
//! (e.g., `9f86d0...-2024-3-7_21-4-9-120553`)
//!
//! Hash is derived from title + creation timestamp. The readable timestamp
//! suffix keeps IDs sortable by eye. Nothing here checks for collisions:
//! whoever owns a collection of entries must enforce uniqueness on insert.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Entry ID must not be empty")]
    Empty,
}

/// Formats the human-readable timestamp suffix
fn timestamp_suffix<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    format!(
        "{}-{}-{}_{}-{}-{}-{}",
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        timestamp.timestamp_subsec_micros()
    )
}

/// Generates a hex hash from title and timestamp
fn generate_hash<Tz: TimeZone>(title: &str, timestamp: &DateTime<Tz>) -> String {
    let input = format!("{}{}", title, timestamp.timestamp_nanos_opt().unwrap_or(0));
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Opaque identifier of a journal entry
///
/// Generated IDs follow the format above, but any non-blank token loaded
/// from text or a record is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new ID from title and timestamp
    pub fn new<Tz: TimeZone>(title: &str, timestamp: DateTime<Tz>) -> Self {
        Self(format!(
            "{}-{}",
            generate_hash(title, &timestamp),
            timestamp_suffix(&timestamp)
        ))
    }

    /// Creates a new ID from title and the current local time
    pub fn generate(title: &str) -> Self {
        Self::new(title, Local::now())
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for EntryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}
