//! Error types for card import.

use thiserror::Error;

/// Errors that can occur when importing character cards and world books.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG container error.
    #[error("{0}")]
    Png(#[from] charcard_png::Error),

    /// No `tEXt` tag signature anywhere in the container.
    #[error("no tEXt chunk found in container")]
    ChunkNotFound,

    /// The declared chunk length runs past the end of the container.
    #[error(
        "malformed container: tEXt chunk at offset {tag_offset} declares {declared} bytes but only {available} remain"
    )]
    MalformedContainer {
        tag_offset: usize,
        declared: u32,
        available: usize,
    },

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The payload is not a JSON object.
    #[error("invalid card payload: {0}")]
    InvalidPayload(String),

    /// The document lacks a usable value for a required field.
    #[error("card document has no non-empty `{0}` field")]
    MissingRequiredField(&'static str),

    /// The file is neither an image nor a JSON document.
    #[error("unsupported card format: {0}")]
    UnsupportedFormat(String),

    /// The world book document has no recognizable entry list.
    #[error("invalid world book: {0}")]
    InvalidWorldBook(String),

    /// Serializing a document failed.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for card operations.
pub type Result<T> = std::result::Result<T, Error>;
