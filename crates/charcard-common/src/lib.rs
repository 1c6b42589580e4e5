//! Common utilities for charcard.
//!
//! This crate provides foundational types and utilities used across all charcard crates:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading of chunk headers
//! - [`crc`] - CRC-32 (ISO-HDLC) as used by PNG chunk trailers
//! - [`search`] - Byte pattern searching backed by `memchr`

mod error;
mod reader;

pub mod crc;
pub mod search;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
