//! Structured walking of a PNG chunk sequence.

use charcard_common::BinaryReader;
use tracing::trace;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::chunk::{Chunk, ChunkTag};
use crate::{Error, Result};

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Check whether a buffer starts with the PNG signature.
#[inline]
pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// IHDR chunk data (13 bytes).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Ihdr {
    /// Width in pixels
    pub width: U32<BigEndian>,
    /// Height in pixels
    pub height: U32<BigEndian>,
    /// Bits per sample
    pub bit_depth: u8,
    /// Color type (0, 2, 3, 4 or 6)
    pub color_type: u8,
    /// Compression method (always 0)
    pub compression: u8,
    /// Filter method (always 0)
    pub filter: u8,
    /// Interlace method (0 or 1)
    pub interlace: u8,
}

impl Ihdr {
    /// Size of the IHDR data in bytes.
    pub const SIZE: usize = 13;

    /// Parse IHDR from chunk data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(BinaryReader::new(data).read_struct::<Self>()?)
    }

    /// Image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Iterator over the chunks of a PNG buffer.
///
/// Iteration stops after `IEND`, at the end of the buffer, or after
/// yielding the first error. Trailing bytes after `IEND` are ignored.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    reader: BinaryReader<'a>,
    done: bool,
}

impl<'a> Chunks<'a> {
    /// Start walking a PNG buffer. Fails if the signature is missing.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if !is_png(data) {
            return Err(Error::NotPng);
        }
        Ok(Self {
            reader: BinaryReader::new_at(data, PNG_SIGNATURE.len()),
            done: false,
        })
    }

    /// Offset of the next chunk to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let offset = self.reader.position();
        let length = self.reader.read_u32()?;
        let tag = ChunkTag(self.reader.read_tag()?);

        // Data plus the 4-byte CRC must fit
        let available = self.reader.remaining();
        if (length as usize).saturating_add(4) > available {
            return Err(Error::Truncated {
                offset,
                declared: length,
                available: available.saturating_sub(4),
            });
        }

        let data = self.reader.read_bytes(length as usize)?;
        let stored_crc = self.reader.read_u32()?;

        trace!(%tag, offset, length, "read chunk");

        Ok(Chunk {
            offset,
            tag,
            data,
            stored_crc,
        })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_empty() {
            return None;
        }

        let result = self.read_chunk();
        match &result {
            Ok(chunk) if chunk.tag == ChunkTag::IEND => self.done = true,
            Ok(_) => {}
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PngWriter;

    fn ihdr_bytes() -> [u8; 13] {
        [0, 0, 0, 2, 0, 0, 0, 3, 8, 6, 0, 0, 0]
    }

    #[test]
    fn test_is_png() {
        assert!(is_png(&PNG_SIGNATURE));
        assert!(!is_png(b"GIF89a"));
        assert!(!is_png(&PNG_SIGNATURE[..4]));
    }

    #[test]
    fn test_not_png() {
        assert!(matches!(Chunks::new(b"not a png"), Err(Error::NotPng)));
    }

    #[test]
    fn test_walk_chunks() {
        let png = PngWriter::new()
            .chunk(ChunkTag::IHDR, &ihdr_bytes())
            .unwrap()
            .chunk(ChunkTag::IDAT, &[1, 2, 3])
            .unwrap()
            .chunk(ChunkTag::IEND, &[])
            .unwrap()
            .finish();

        let chunks: Vec<_> = Chunks::new(&png).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].tag, ChunkTag::IHDR);
        assert_eq!(chunks[0].offset, 8);
        assert_eq!(chunks[1].data, &[1, 2, 3]);
        assert_eq!(chunks[1].offset, chunks[0].end());
        assert!(chunks.iter().all(Chunk::crc_valid));

        let ihdr = Ihdr::parse(chunks[0].data).unwrap();
        assert_eq!(ihdr.width(), 2);
        assert_eq!(ihdr.height(), 3);
        assert_eq!(ihdr.bit_depth, 8);
        assert_eq!(ihdr.color_type, 6);
    }

    #[test]
    fn test_stops_after_iend() {
        let mut png = PngWriter::new()
            .chunk(ChunkTag::IEND, &[])
            .unwrap()
            .finish();
        png.extend_from_slice(b"trailing garbage");

        let chunks: Vec<_> = Chunks::new(&png).unwrap().collect();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_ok());
    }

    #[test]
    fn test_truncated_chunk() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&100u32.to_be_bytes());
        png.extend_from_slice(b"IDAT");
        png.extend_from_slice(&[0; 10]);

        let mut chunks = Chunks::new(&png).unwrap();
        assert!(matches!(
            chunks.next(),
            Some(Err(Error::Truncated {
                offset: 8,
                declared: 100,
                ..
            }))
        ));
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_detects_bad_crc() {
        let mut png = PngWriter::new()
            .chunk(ChunkTag::TEXT, b"k\0v")
            .unwrap()
            .finish();
        let last = png.len() - 1;
        png[last] ^= 0xFF;

        let chunk = Chunks::new(&png).unwrap().next().unwrap().unwrap();
        assert!(!chunk.crc_valid());
    }

    #[test]
    fn test_ihdr_too_short() {
        assert!(Ihdr::parse(&[0; 12]).is_err());
    }
}
