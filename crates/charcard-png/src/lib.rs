//! PNG chunk layer for charcard.
//!
//! A PNG file is an 8-byte signature followed by a sequence of chunks:
//!
//! - 4 bytes: Data length (big-endian)
//! - 4 bytes: Chunk type tag (`IHDR`, `tEXt`, `IDAT`, `IEND`, ...)
//! - N bytes: Chunk data
//! - 4 bytes: CRC-32 over tag and data
//!
//! Character cards hide their definition in an ancillary `tEXt` chunk, whose
//! data is `keyword NUL text`. This crate provides two ways of finding it:
//!
//! - [`Chunks`] walks the chunk sequence structurally, starting after the
//!   signature.
//! - [`TagScanner`] searches the raw bytes for a tag signature anywhere in
//!   the buffer and reads the length prefix in front of each hit. This also
//!   works on truncated or non-conforming containers.
//!
//! # Example
//!
//! ```
//! use charcard_png::{embed_text_chunk, ChunkTag, Chunks, PngWriter};
//!
//! let png = PngWriter::new()
//!     .chunk(ChunkTag::IHDR, &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0])?
//!     .chunk(ChunkTag::IEND, &[])?
//!     .finish();
//!
//! let card = embed_text_chunk(&png, "chara", "{\"name\":\"Aria\"}")?;
//! let tags: Vec<_> = Chunks::new(&card)?
//!     .map(|chunk| chunk.map(|c| c.tag))
//!     .collect::<charcard_png::Result<_>>()?;
//! assert_eq!(tags, vec![ChunkTag::IHDR, ChunkTag::TEXT, ChunkTag::IEND]);
//! # Ok::<(), charcard_png::Error>(())
//! ```

mod chunk;
mod container;
mod error;
mod scan;
mod writer;

pub use chunk::{Chunk, ChunkTag, TextChunk};
pub use container::{is_png, Chunks, Ihdr, PNG_SIGNATURE};
pub use error::{Error, Result};
pub use scan::{Candidate, TagScanner};
pub use writer::{embed_text_chunk, write_chunk, PngWriter, MAX_KEYWORD_LEN};
