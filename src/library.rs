//! On-disk character library.
//!
//! The library is a single JSON file holding the imported characters and the
//! active world book, using the same field names as the browser front-end's
//! local storage so exports can be moved between the two.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use charcard::prelude::{CharacterRecord, WorldBook};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Greeting shown in the chat list for a freshly imported character.
const GREETING: &str = "Hello! Nice to meet you!";

/// A character as stored in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCharacter {
    pub id: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub last_time: String,
    #[serde(default)]
    pub online: bool,
    /// The full imported card document.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

/// The library file contents.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    pub characters: Vec<LibraryCharacter>,
    #[serde(default)]
    pub world_book: WorldBook,
}

impl Library {
    /// Load a library, starting empty if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read library {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse library {}", path.display()))
    }

    /// Write the library, replacing the file only once the write succeeded.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("Failed to write library")?;
        fs::rename(&tmp, path).context("Failed to replace library")?;
        Ok(())
    }

    /// Add an imported character and return the stored entry.
    pub fn add(&mut self, record: CharacterRecord, now: SystemTime) -> &LibraryCharacter {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let id = self.unique_id(&format!("char_{}", since_epoch.as_millis()));

        let entry = LibraryCharacter {
            id,
            name: record.name().to_string(),
            avatar: record.avatar().to_string(),
            description: record.description().to_string(),
            last_message: GREETING.to_string(),
            last_time: clock_time(since_epoch.as_secs()),
            online: true,
            data: record.into_document(),
        };

        self.characters.push(entry);
        &self.characters[self.characters.len() - 1]
    }

    /// Replace the world book.
    pub fn set_world_book(&mut self, book: WorldBook) {
        self.world_book = book;
    }

    fn unique_id(&self, base: &str) -> String {
        let taken = |id: &str| self.characters.iter().any(|c| c.id == id);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|id| !taken(id))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Format seconds since the epoch as `HH:MM` (UTC).
fn clock_time(secs: u64) -> String {
    let minutes = secs / 60 % 60;
    let hours = secs / 3600 % 24;
    format!("{hours:02}:{minutes:02}")
}
