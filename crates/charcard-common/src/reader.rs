//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! network-order (big-endian) data from a byte slice without copying.
//! PNG stores every multi-byte integer big-endian.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use charcard_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 13);
/// assert_eq!(reader.read_tag().unwrap(), *b"IHDR");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a 4-byte chunk tag.
    #[inline]
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::byteorder::{BigEndian, U16};
    use zerocopy::{Immutable, KnownLayout};

    use super::*;

    #[derive(FromBytes, Immutable, KnownLayout)]
    #[repr(C)]
    struct Pair {
        first: U16<BigEndian>,
        second: U16<BigEndian>,
    }

    #[test]
    fn test_read_chunk_header() {
        let data = [0x00, 0x00, 0x01, 0x00, b't', b'E', b'X', b't', 0xAA];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 256);
        assert_eq!(reader.read_tag().unwrap(), *b"tEXt");
        assert_eq!(reader.position(), 8);
        assert_eq!(reader.remaining(), 1);
        assert!(!reader.is_empty());
    }

    #[test]
    fn test_new_at_skips_prefix() {
        let data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x00IEND";
        let mut reader = BinaryReader::new_at(data, 8);

        assert_eq!(reader.read_u32().unwrap(), 0);
        assert_eq!(reader.read_bytes(4).unwrap(), b"IEND");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_struct_big_endian() {
        let mut reader = BinaryReader::new(&[0x01, 0x02, 0xFF, 0xFE]);
        let pair = reader.read_struct::<Pair>().unwrap();

        assert_eq!(pair.first.get(), 0x0102);
        assert_eq!(pair.second.get(), 0xFFFE);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
        assert_eq!(reader.position(), 0);
    }
}
