//! Writing PNG chunks and embedding text chunks into existing files.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use charcard_common::crc;
use tracing::debug;

use crate::chunk::ChunkTag;
use crate::container::{Chunks, PNG_SIGNATURE};
use crate::{Error, Result};

/// Maximum length of a `tEXt` keyword in bytes.
pub const MAX_KEYWORD_LEN: usize = 79;

/// Largest data length PNG allows in a chunk (2^31 - 1).
const MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// Write one complete chunk (length, tag, data, CRC).
pub fn write_chunk<W: Write>(out: &mut W, tag: ChunkTag, data: &[u8]) -> Result<()> {
    if data.len() > MAX_CHUNK_LEN {
        return Err(Error::ChunkTooLarge(data.len()));
    }

    out.write_u32::<BigEndian>(data.len() as u32)?;
    out.write_all(tag.as_bytes())?;
    out.write_all(data)?;
    out.write_u32::<BigEndian>(crc::chunk_crc(tag.as_bytes(), data))?;
    Ok(())
}

/// Builder that assembles a PNG from chunks.
#[derive(Debug, Clone)]
pub struct PngWriter {
    buffer: Vec<u8>,
}

impl PngWriter {
    /// Start a new PNG with just the signature.
    pub fn new() -> Self {
        Self {
            buffer: PNG_SIGNATURE.to_vec(),
        }
    }

    /// Append a chunk.
    pub fn chunk(mut self, tag: ChunkTag, data: &[u8]) -> Result<Self> {
        write_chunk(&mut self.buffer, tag, data)?;
        Ok(self)
    }

    /// Append a `tEXt` chunk with a keyword.
    pub fn text(self, keyword: &str, text: &[u8]) -> Result<Self> {
        let data = text_chunk_data(keyword, text)?;
        self.chunk(ChunkTag::TEXT, &data)
    }

    /// Append raw bytes that are already a valid chunk.
    fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Finish and return the bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

impl Default for PngWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a keyword: 1-79 printable Latin-1 characters, no leading or
/// trailing space.
fn validate_keyword(keyword: &str) -> Result<()> {
    let valid_chars = keyword
        .chars()
        .all(|c| matches!(c, ' '..='~' | '\u{A1}'..='\u{FF}'));
    let len = keyword.chars().count();

    if len == 0
        || len > MAX_KEYWORD_LEN
        || !valid_chars
        || keyword.starts_with(' ')
        || keyword.ends_with(' ')
    {
        return Err(Error::InvalidKeyword(keyword.to_string()));
    }
    Ok(())
}

/// Build `tEXt` chunk data: Latin-1 keyword, NUL, text.
fn text_chunk_data(keyword: &str, text: &[u8]) -> Result<Vec<u8>> {
    validate_keyword(keyword)?;

    let mut data = Vec::with_capacity(keyword.len() + 1 + text.len());
    // Validated above, every char fits in one byte
    data.extend(keyword.chars().map(|c| c as u8));
    data.push(0);
    data.extend_from_slice(text);
    Ok(data)
}

/// Embed a `tEXt` chunk into an existing PNG.
///
/// Existing `tEXt` chunks with the same keyword are dropped and the new chunk
/// is placed right before `IEND`. All other chunks are copied unchanged,
/// including their stored CRCs.
pub fn embed_text_chunk(png: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
    let mut writer = PngWriter::new();
    let mut replaced = 0usize;

    for chunk in Chunks::new(png)? {
        let chunk = chunk?;

        if let Some(existing) = chunk.as_text() {
            if existing.keyword_lossy().as_deref() == Some(keyword) {
                replaced += 1;
                continue;
            }
        }

        if chunk.tag == ChunkTag::IEND {
            writer = writer.text(keyword, text.as_bytes())?;
            debug!(keyword, replaced, length = text.len(), "embedded text chunk");
            return Ok(writer.raw(&png[chunk.offset..chunk.end()]).finish());
        }

        writer = writer.raw(&png[chunk.offset..chunk.end()]);
    }

    Err(Error::MissingIend)
}
