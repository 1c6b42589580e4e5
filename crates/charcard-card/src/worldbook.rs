//! World book (lore book) import.
//!
//! A world book is a list of lore entries that the chat back-end injects into
//! prompts when their keys appear in the conversation. Exports come in two
//! shapes: a bare array of entries, or an object with an `entries` field that
//! holds either an array or an object keyed by entry id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::value_kind;
use crate::{Error, Result};

/// A single lore entry, kept as the original JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldBookEntry(Value);

impl WorldBookEntry {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Trigger keys from `keys` (array) or `key` (string or array).
    pub fn keys(&self) -> Vec<&str> {
        let field = self.0.get("keys").or_else(|| self.0.get("key"));
        match field {
            Some(Value::String(key)) => vec![key.as_str()],
            Some(Value::Array(keys)) => keys.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Lore text.
    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(Value::as_str)
    }

    /// Human-readable title.
    pub fn comment(&self) -> Option<&str> {
        self.0.get("comment").and_then(Value::as_str)
    }

    /// The raw entry.
    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// An ordered list of lore entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldBook {
    entries: Vec<WorldBookEntry>,
}

impl WorldBook {
    /// Parse a world book export.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))
            .map_err(|e| Error::InvalidWorldBook(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a world book from a parsed document.
    pub fn from_value(value: Value) -> Result<Self> {
        let entries = match value {
            Value::Array(items) => items,
            Value::Object(mut document) => match document.remove("entries") {
                Some(Value::Array(items)) => items,
                Some(Value::Object(by_id)) => {
                    let mut keyed: Vec<_> = by_id.into_iter().collect();
                    keyed.sort_by(|(a, _), (b, _)| entry_order(a).cmp(&entry_order(b)));
                    keyed.into_iter().map(|(_, entry)| entry).collect()
                }
                Some(other) => {
                    return Err(Error::InvalidWorldBook(format!(
                        "`entries` is {}",
                        value_kind(&other)
                    )))
                }
                None => {
                    return Err(Error::InvalidWorldBook(
                        "object has no `entries` field".to_string(),
                    ))
                }
            },
            other => {
                return Err(Error::InvalidWorldBook(format!(
                    "expected an array or an object, found {}",
                    value_kind(&other)
                )))
            }
        };

        Ok(Self {
            entries: entries.into_iter().map(WorldBookEntry).collect(),
        })
    }

    /// All entries in order.
    pub fn entries(&self) -> &[WorldBookEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, WorldBookEntry> {
        self.entries.iter()
    }

    /// Remove the entry at `index`, if it exists.
    pub fn remove(&mut self, index: usize) -> Option<WorldBookEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a WorldBook {
    type Item = &'a WorldBookEntry;
    type IntoIter = std::slice::Iter<'a, WorldBookEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Numeric ids first in numeric order, then everything else by name.
fn entry_order(key: &str) -> (u8, u64, &str) {
    match key.parse::<u64>() {
        Ok(n) => (0, n, key),
        Err(_) => (1, 0, key),
    }
}
