//! Journal entry domain model
//!
//! An entry is a title, a set of named sections ("headings") and a set of
//! tags. Entries are read from and written back to an underline-heading
//! markup:
//!
//! ```text
//! Title
//! =====
//! notes text
//! Heading Name
//! ------------
//! heading text
//! id: <token>
//! tags: <tag> <tag>
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use thiserror::Error;

use super::heading;
use super::id::EntryId;
use super::metadata::{strip_metadata, tokenize};

/// Heading holding the text written directly under the title
pub const NOTES: &str = "notes";

/// Heading names that never produce a tag and are never rendered with a label
pub const RESERVED_HEADINGS: &[&str] = &[NOTES];

/// Keys a structured record must carry
const REQUIRED_FIELDS: &[&str] = &["title", "headings", "tags"];

/// Returns true if the name is a reserved heading
pub fn is_reserved(name: &str) -> bool {
    RESERVED_HEADINGS.contains(&name)
}

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("Malformed entry: {0}")]
    Malformed(String),

    #[error("Missing \"title\", \"headings\" or \"tags\" fields")]
    MissingField,

    #[error("Invalid entry record: {0}")]
    InvalidRecord(String),

    #[error("Unknown heading: {0}")]
    UnknownHeading(String),
}

/// Derives the tag for a heading: tokens joined with `-`
fn heading_tag(name: &str) -> String {
    tokenize(name).collect::<Vec<_>>().join("-")
}

/// Capitalizes the first letter of every word and lower-cases the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;

    for c in s.chars() {
        if prev_alphabetic {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alphabetic = c.is_alphabetic();
    }

    out
}

/// Options for rendering an entry back to markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render heading names title-cased instead of as stored
    pub title_case_headings: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title_case_headings: true,
        }
    }
}

/// A single journal entry
///
/// Two entries are equal when their titles match case-insensitively, and
/// entries order by case-insensitive title. This is not value equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    /// Entry title, a single line
    pub title: String,

    /// Identifier, fixed for the lifetime of the entry
    id: EntryId,

    /// Lower-cased heading name to body text
    ///
    /// Call [`Entry::refresh`] after mutating this directly.
    pub headings: BTreeMap<String, String>,

    /// Lower-cased tags, always including one tag per non-reserved heading
    ///
    /// Call [`Entry::refresh`] after mutating this directly.
    pub tags: BTreeSet<String>,
}

impl Entry {
    /// Creates a new entry, generating an ID if none is given
    pub fn new(
        title: impl Into<String>,
        headings: impl IntoIterator<Item = (String, String)>,
        tags: impl IntoIterator<Item = String>,
        id: Option<EntryId>,
    ) -> Self {
        let title = title.into();
        let id = id.unwrap_or_else(|| EntryId::generate(&title));

        let mut entry = Self {
            title,
            id,
            headings: headings
                .into_iter()
                .map(|(name, body)| (name.to_lowercase(), body))
                .collect(),
            tags: tags.into_iter().collect(),
        };
        entry.refresh();
        entry
    }

    /// Creates an entry with a title and nothing else
    pub fn blank(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new(), Vec::new(), None)
    }

    /// Parses a single entry from markup
    ///
    /// The trailing `tags:` and `id:` lines are stripped first. The first
    /// underlined line is the title; text up to the first section heading
    /// becomes the `notes` heading, which is omitted when blank.
    pub fn from_markup(text: &str) -> Result<Self, EntryError> {
        if text.trim().is_empty() {
            return Err(EntryError::Malformed("The entry was completely empty".to_string()));
        }

        let meta = strip_metadata(text);
        let outline = heading::scan(&meta.lines).ok_or_else(|| {
            debug!("rejecting entry without a title ({} lines)", meta.lines.len());
            EntryError::Malformed("No title in entry".to_string())
        })?;

        let mut headings = Vec::with_capacity(outline.sections.len() + 1);
        if !outline.notes.trim().is_empty() {
            headings.push((NOTES.to_string(), outline.notes));
        }
        headings.extend(outline.sections);

        let id = meta.id.and_then(|id| id.parse().ok());
        let entry = Self::new(outline.title, headings, meta.tags, id);

        debug!(
            "parsed entry {:?} with {} headings and {} tags",
            entry.title,
            entry.headings.len(),
            entry.tags.len()
        );
        Ok(entry)
    }

    /// Loads an entry from a structured mapping
    ///
    /// The mapping needs `title`, `headings` and `tags`; `id` is optional.
    pub fn from_value(value: serde_json::Value) -> Result<Self, EntryError> {
        let object = value
            .as_object()
            .ok_or_else(|| EntryError::InvalidRecord("expected a mapping".to_string()))?;

        if REQUIRED_FIELDS.iter().any(|field| !object.contains_key(*field)) {
            return Err(EntryError::MissingField);
        }

        let record: EntryRecord =
            serde_json::from_value(value).map_err(|e| EntryError::InvalidRecord(e.to_string()))?;

        Ok(record.into())
    }

    /// Loads an entry from a JSON mapping
    pub fn from_json(json: &str) -> Result<Self, EntryError> {
        let value = serde_json::from_str(json).map_err(|e| EntryError::InvalidRecord(e.to_string()))?;
        Self::from_value(value)
    }

    /// Loads an entry from a YAML mapping
    pub fn from_yaml(yaml: &str) -> Result<Self, EntryError> {
        let value = serde_yaml::from_str(yaml).map_err(|e| EntryError::InvalidRecord(e.to_string()))?;
        Self::from_value(value)
    }

    /// Returns the entry's identifier
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Returns the untitled notes, if any
    pub fn notes(&self) -> Option<&str> {
        self.heading(NOTES)
    }

    /// Returns the body of a heading, matched case-insensitively
    pub fn heading(&self, name: &str) -> Option<&str> {
        self.headings
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Iterates over tags in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Sets a heading's body, replacing any existing body
    pub fn set_heading(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.headings.insert(name.into().to_lowercase(), body.into());
        self.refresh();
    }

    /// Removes a heading, returning its body
    ///
    /// The tag derived from the heading stays; tags are only ever added by
    /// normalization.
    pub fn remove_heading(&mut self, name: &str) -> Option<String> {
        self.headings.remove(&name.trim().to_lowercase())
    }

    /// Adds empty headings; existing bodies are never overwritten
    pub fn add_headings<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.headings
                .entry(name.as_ref().to_lowercase())
                .or_default();
        }

        self.refresh();
    }

    /// Normalizes headings and tags
    ///
    /// Heading keys are lower-cased. Every non-reserved heading contributes a
    /// tag; tags are lower-cased and reserved names are dropped. Idempotent.
    pub fn refresh(&mut self) {
        self.headings = std::mem::take(&mut self.headings)
            .into_iter()
            .map(|(name, body)| (name.to_lowercase(), body))
            .collect();

        let derived: Vec<String> = self
            .headings
            .keys()
            .filter(|name| !is_reserved(name))
            .map(|name| heading_tag(name))
            .collect();

        self.tags = std::mem::take(&mut self.tags)
            .into_iter()
            .chain(derived)
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty() && !is_reserved(tag))
            .collect();
    }

    /// Reconciles this entry against a freshly parsed one
    ///
    /// Title and tags are replaced. Without expected headings, headings are
    /// replaced too. Otherwise every expected heading missing from
    /// `new_entry` is deleted, then `new_entry`'s headings are overlaid;
    /// headings neither expected nor supplied are kept.
    pub fn update(&mut self, new_entry: &Entry, expected: Option<&[&str]>) {
        self.title = new_entry.title.clone();
        self.tags = new_entry.tags.clone();

        match expected {
            Some(names) if !names.is_empty() => {
                for name in names {
                    let name = name.trim().to_lowercase();
                    if !new_entry.headings.contains_key(&name) {
                        self.headings.remove(&name);
                    }
                }

                self.headings.extend(
                    new_entry
                        .headings
                        .iter()
                        .map(|(name, body)| (name.clone(), body.clone())),
                );
            }
            _ => self.headings = new_entry.headings.clone(),
        }

        self.refresh();
    }

    /// Renders the entry as markup
    ///
    /// With a filter, only the named headings are shown; every name must
    /// exist. Returns an empty string when no shown section has any text.
    pub fn render(&self, filter: Option<&[&str]>) -> Result<String, EntryError> {
        self.render_with(filter, &RenderOptions::default())
    }

    /// Renders the entry as markup with explicit options
    pub fn render_with(
        &self,
        filter: Option<&[&str]>,
        options: &RenderOptions,
    ) -> Result<String, EntryError> {
        let selected = self.select(filter)?;
        let (text, displayed) = self.render_selected(&selected, options);

        Ok(if displayed { text } else { String::new() })
    }

    /// Renders every heading, even empty ones, for editing
    pub fn template(&self) -> String {
        let selected: Vec<&str> = self.headings.keys().map(String::as_str).collect();
        self.render_selected(&selected, &RenderOptions::default()).0
    }

    /// Resolves a render filter to stored heading names in sorted order
    fn select<'a>(&'a self, filter: Option<&[&str]>) -> Result<Vec<&'a str>, EntryError> {
        let names = match filter {
            Some(names) if !names.is_empty() => names,
            _ => return Ok(self.headings.keys().map(String::as_str).collect()),
        };

        let wanted: BTreeSet<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();

        wanted
            .into_iter()
            .map(|name| {
                self.headings
                    .get_key_value(&name)
                    .map(|(key, _)| key.as_str())
                    .ok_or(EntryError::UnknownHeading(name))
            })
            .collect()
    }

    /// Renders the given headings; also reports whether any text was shown
    fn render_selected(&self, selected: &[&str], options: &RenderOptions) -> (String, bool) {
        let mut lines: Vec<String> = vec![
            self.title.clone(),
            "=".repeat(self.title.chars().count()),
        ];
        let mut displayed = false;

        if selected.contains(&NOTES) {
            if let Some(notes) = self.notes() {
                displayed |= !notes.trim().is_empty();
                lines.push(notes.to_string());
            }
        }

        for &name in selected.iter().filter(|name| !is_reserved(name)) {
            let Some(body) = self.headings.get(name) else {
                continue;
            };

            displayed |= !body.trim().is_empty();
            lines.push(if options.title_case_headings {
                title_case(name)
            } else {
                name.to_string()
            });
            lines.push("-".repeat(name.chars().count()));
            lines.push(body.clone());
        }

        lines.push(format!("id: {}", self.id));
        lines.push(format!("tags: {}", self.tags.iter().cloned().collect::<Vec<_>>().join(" ")));

        // Becomes the trailing newline
        lines.push(String::new());

        (lines.join("\n"), displayed)
    }
}

impl FromStr for Entry {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_markup(s)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.title.to_lowercase().cmp(&other.title.to_lowercase())
    }
}

/// Structured form of an entry: the load and dump format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub title: String,
    pub headings: BTreeMap<String, String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            headings: entry.headings.clone(),
            tags: entry.tags.iter().cloned().collect(),
            id: Some(entry.id.to_string()),
        }
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        Self {
            title: entry.title,
            headings: entry.headings,
            tags: entry.tags.into_iter().collect(),
            id: Some(entry.id.into()),
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        // A blank id means "not assigned yet"
        let id = record.id.and_then(|id| id.parse().ok());
        Entry::new(record.title, record.headings, record.tags, id)
    }
}
