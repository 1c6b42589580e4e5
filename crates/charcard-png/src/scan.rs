//! Signature scanning for chunk tags.
//!
//! Unlike [`Chunks`](crate::Chunks), the scanner does not follow the chunk
//! sequence. It searches the raw buffer for the tag bytes and treats the four
//! bytes in front of every hit as a big-endian length prefix. Pixel data can
//! contain the tag bytes by coincidence, so a hit is only a candidate.

use charcard_common::search::{self, PatternIter};
use tracing::trace;

use crate::chunk::ChunkTag;
use crate::{Error, Result};

/// A possible chunk found by [`TagScanner`].
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Offset of the tag bytes within the buffer.
    pub tag_offset: usize,
    /// Length read from the four bytes preceding the tag.
    pub declared_length: u32,
    container: &'a [u8],
}

impl<'a> Candidate<'a> {
    /// Offset of the first data byte, right after the tag.
    #[inline]
    pub fn data_offset(&self) -> usize {
        self.tag_offset + 4
    }

    /// Bytes available after the tag.
    #[inline]
    pub fn available(&self) -> usize {
        self.container.len().saturating_sub(self.data_offset())
    }

    /// The declared data region.
    ///
    /// Fails with [`Error::Truncated`] if the declared length runs past the
    /// end of the buffer. A trailing CRC is not required.
    pub fn data(&self) -> Result<&'a [u8]> {
        let start = self.data_offset();
        let length = self.declared_length as usize;
        if length > self.available() {
            return Err(Error::Truncated {
                offset: self.tag_offset - 4,
                declared: self.declared_length,
                available: self.available(),
            });
        }
        Ok(&self.container[start..start + length])
    }
}

/// Iterator over every occurrence of a chunk tag, leftmost first.
///
/// Occurrences in the first four bytes of the buffer have no room for a
/// length prefix and are skipped.
#[derive(Debug, Clone)]
pub struct TagScanner<'a> {
    container: &'a [u8],
    hits: PatternIter<'a>,
    tag: ChunkTag,
}

impl<'a> TagScanner<'a> {
    /// Scan a buffer for a tag.
    pub fn new(container: &'a [u8], tag: &'a ChunkTag) -> Self {
        Self {
            container,
            hits: search::find_pattern_iter(tag.as_bytes(), container),
            tag: *tag,
        }
    }

    /// Scan a buffer for `tEXt` chunks.
    pub fn text(container: &'a [u8]) -> Self {
        Self::new(container, &ChunkTag::TEXT)
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Candidate<'a>> {
        loop {
            let tag_offset = self.hits.next()?;
            if tag_offset < 4 {
                trace!(tag = %self.tag, tag_offset, "tag without room for a length prefix");
                continue;
            }

            let prefix = &self.container[tag_offset - 4..tag_offset];
            let declared_length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
            trace!(tag = %self.tag, tag_offset, declared_length, "tag candidate");

            return Some(Candidate {
                tag_offset,
                declared_length,
                container: self.container,
            });
        }
    }
}
