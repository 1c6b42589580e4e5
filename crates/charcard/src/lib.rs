//! charcard - role-play character card extraction and embedding library.
//!
//! This crate provides a unified interface to the charcard library ecosystem
//! for working with character cards and world books.
//!
//! # Crates
//!
//! - [`charcard_common`] - Common utilities (big-endian reading, CRC-32, byte search)
//! - [`charcard_png`] - PNG chunk walking, tag scanning and text chunk embedding
//! - [`charcard_card`] - Character records, card extraction and world books
//!
//! # Example
//!
//! ```no_run
//! use charcard::prelude::*;
//!
//! let bytes = std::fs::read("card.png")?;
//!
//! // Inspect the container
//! for chunk in Chunks::new(&bytes)? {
//!     let chunk = chunk?;
//!     println!("{} {} bytes", chunk.tag, chunk.length());
//! }
//!
//! // Pull out the character
//! let record = extract(&bytes)?;
//! println!("{}", record.name());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use charcard_card as card;
pub use charcard_common as common;
pub use charcard_png as png;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use charcard_card::{
        embed_record, extract, import_bytes, import_file, import_json, import_json_with,
        CardSource, CharacterRecord, ExtractOptions, Extractor, KeywordPolicy, PayloadEncoding,
        PayloadMode, ScanStrategy, WorldBook, WorldBookEntry, DEFAULT_AVATAR, DEFAULT_KEYWORD,
    };
    pub use charcard_common::{crc, BinaryReader};
    pub use charcard_png::{
        embed_text_chunk, is_png, Chunk, ChunkTag, Chunks, Ihdr, PngWriter, TagScanner,
        TextChunk,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
