//! CRC-32 hashing utilities.
//!
//! PNG protects every chunk with a CRC-32 (ISO-HDLC polynomial) computed over
//! the chunk type tag followed by the chunk data. The length field is not
//! covered.

/// Compute the CRC of a PNG chunk from its tag and data.
#[inline]
pub fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(data);
    hasher.finalize()
}
