//! Character card import for role-play chat front-ends.
//!
//! A character card is a persona definition (name, avatar, description,
//! personality and arbitrary extra fields) shipped either as a JSON document
//! or hidden inside an image as a `tEXt` chunk.
//!
//! # Extraction
//!
//! [`extract`] scans an image buffer for the `tEXt` tag, reads the
//! big-endian length in front of it and decodes the data region:
//!
//! 1. Optional Latin-1 `keyword NUL`, then UTF-8 text
//! 2. A JSON object
//! 3. A non-empty top-level `name`, with defaults for `avatar` and
//!    `description`
//!
//! [`PayloadMode::Lenient`] additionally accepts base64-wrapped JSON and
//! `chara_card_v2` documents that nest their fields under `data`.
//!
//! Each step has its own [`Error`] variant: [`Error::ChunkNotFound`],
//! [`Error::MalformedContainer`], [`Error::Decode`], [`Error::InvalidPayload`]
//! and [`Error::MissingRequiredField`].
//!
//! # Example
//!
//! ```no_run
//! use charcard_card::{import_file, ExtractOptions, WorldBook};
//!
//! let record = import_file("seraphina.png", &ExtractOptions::default())?;
//! println!("{} {}: {}", record.avatar(), record.name(), record.description());
//!
//! let lore = WorldBook::from_json(&std::fs::read("lore.json")?)?;
//! println!("{} lore entries", lore.len());
//! # Ok::<(), charcard_card::Error>(())
//! ```

mod embed;
mod error;
mod extract;
mod import;
mod payload;
mod record;
mod worldbook;

pub use embed::{embed_record, PayloadEncoding, DEFAULT_KEYWORD};
pub use error::{Error, Result};
pub use extract::{extract, ExtractOptions, Extractor, ScanStrategy};
pub use import::{import_bytes, import_file, import_json, import_json_with, CardSource};
pub use payload::{KeywordPolicy, PayloadMode};
pub use record::{CharacterRecord, DEFAULT_AVATAR};
pub use worldbook::{WorldBook, WorldBookEntry};
