//! Error types for the PNG crate.

use thiserror::Error;

/// Errors that can occur when working with PNG containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] charcard_common::Error),

    /// The buffer does not start with the PNG signature.
    #[error("missing PNG signature")]
    NotPng,

    /// A chunk declares more data than the buffer holds.
    #[error(
        "chunk at offset {offset} declares {declared} data bytes but only {available} remain"
    )]
    Truncated {
        offset: usize,
        declared: u32,
        available: usize,
    },

    /// The chunk sequence ended without an `IEND` chunk.
    #[error("PNG has no IEND chunk")]
    MissingIend,

    /// Text chunk keyword is empty, too long, or contains invalid characters.
    #[error("invalid text chunk keyword: {0:?}")]
    InvalidKeyword(String),

    /// Chunk data does not fit in a 31-bit length field.
    #[error("chunk data too large: {0} bytes")]
    ChunkTooLarge(usize),
}

/// Result type for PNG operations.
pub type Result<T> = std::result::Result<T, Error>;
