//! Chunk types.

use std::fmt;

use charcard_common::{crc, search};

/// A 4-byte PNG chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    /// Image header.
    pub const IHDR: Self = Self(*b"IHDR");
    /// Palette.
    pub const PLTE: Self = Self(*b"PLTE");
    /// Image data.
    pub const IDAT: Self = Self(*b"IDAT");
    /// Image trailer.
    pub const IEND: Self = Self(*b"IEND");
    /// Uncompressed Latin-1 text.
    pub const TEXT: Self = Self(*b"tEXt");
    /// Compressed text.
    pub const ZTXT: Self = Self(*b"zTXt");
    /// International (UTF-8) text.
    pub const ITXT: Self = Self(*b"iTXt");

    /// Get the raw tag bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter (bit 5 clear).
    #[inline]
    pub const fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    /// Check whether every byte is an ASCII letter, as PNG requires.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic)
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({})", self)
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl From<[u8; 4]> for ChunkTag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

/// A chunk borrowed from a PNG buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Offset of the length field within the buffer.
    pub offset: usize,
    /// Chunk type.
    pub tag: ChunkTag,
    /// Chunk data.
    pub data: &'a [u8],
    /// CRC as stored in the file.
    pub stored_crc: u32,
}

impl<'a> Chunk<'a> {
    /// Length of the chunk data.
    #[inline]
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Size of the whole chunk including length, tag and CRC.
    #[inline]
    pub fn total_size(&self) -> usize {
        4 + 4 + self.data.len() + 4
    }

    /// Offset one past the last byte of this chunk.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.total_size()
    }

    /// Offset of the data region.
    #[inline]
    pub fn data_offset(&self) -> usize {
        self.offset + 8
    }

    /// Recompute the CRC over tag and data.
    #[inline]
    pub fn calculated_crc(&self) -> u32 {
        crc::chunk_crc(self.tag.as_bytes(), self.data)
    }

    /// Check the stored CRC against the data.
    #[inline]
    pub fn crc_valid(&self) -> bool {
        self.stored_crc == self.calculated_crc()
    }

    /// Interpret this chunk as a `tEXt` chunk.
    pub fn as_text(&self) -> Option<TextChunk<'a>> {
        (self.tag == ChunkTag::TEXT).then(|| TextChunk::parse(self.data))
    }
}

/// The data of a `tEXt` chunk split into keyword and text.
///
/// The keyword is absent when the data has no NUL separator. Some tools write
/// bare text without a keyword, so that case is not treated as an error here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    /// Keyword bytes (without the NUL separator).
    pub keyword: Option<&'a [u8]>,
    /// Text bytes following the separator, or the whole data.
    pub text: &'a [u8],
}

impl<'a> TextChunk<'a> {
    /// Split chunk data at the first NUL byte.
    pub fn parse(data: &'a [u8]) -> Self {
        match search::find_null(data) {
            Some(pos) => Self {
                keyword: Some(&data[..pos]),
                text: &data[pos + 1..],
            },
            None => Self {
                keyword: None,
                text: data,
            },
        }
    }

    /// Keyword decoded as Latin-1.
    pub fn keyword_lossy(&self) -> Option<String> {
        self.keyword
            .map(|k| k.iter().map(|&b| char::from(b)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_properties() {
        assert!(ChunkTag::IHDR.is_critical());
        assert!(ChunkTag::IEND.is_critical());
        assert!(!ChunkTag::TEXT.is_critical());
        assert!(ChunkTag::TEXT.is_well_formed());
        assert!(!ChunkTag(*b"t3Xt").is_well_formed());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(ChunkTag::TEXT.to_string(), "tEXt");
        assert_eq!(ChunkTag([b'a', 0, b'b', 0xff]).to_string(), "a\\x00b\\xff");
    }

    #[test]
    fn test_text_chunk_with_keyword() {
        let text = TextChunk::parse(b"chara\0eyJuYW1lIjoiQSJ9");
        assert_eq!(text.keyword, Some(&b"chara"[..]));
        assert_eq!(text.text, b"eyJuYW1lIjoiQSJ9");
        assert_eq!(text.keyword_lossy().as_deref(), Some("chara"));
    }

    #[test]
    fn test_text_chunk_without_keyword() {
        let text = TextChunk::parse(b"{\"name\":\"A\"}");
        assert_eq!(text.keyword, None);
        assert_eq!(text.text, b"{\"name\":\"A\"}");
    }

    #[test]
    fn test_chunk_geometry() {
        let chunk = Chunk {
            offset: 33,
            tag: ChunkTag::TEXT,
            data: b"abc",
            stored_crc: crc::chunk_crc(b"tEXt", b"abc"),
        };
        assert_eq!(chunk.total_size(), 15);
        assert_eq!(chunk.data_offset(), 41);
        assert_eq!(chunk.end(), 48);
        assert!(chunk.crc_valid());
        assert!(chunk.as_text().is_some());
    }
}
