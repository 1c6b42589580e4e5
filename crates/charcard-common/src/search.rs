//! Byte pattern searching.
//!
//! Thin wrappers over `memchr`, which picks the fastest SIMD implementation
//! available at runtime (AVX2, SSE2, NEON, or scalar fallback).

use memchr::memmem;

/// Find the first null byte in a slice, returning its index.
#[inline]
pub fn find_null(data: &[u8]) -> Option<usize> {
    memchr::memchr(0, data)
}

/// Iterate over every occurrence of a pattern, leftmost first.
///
/// Overlapping occurrences are reported, so `"aa"` in `"aaa"` yields
/// offsets 0 and 1.
pub fn find_pattern_iter<'h>(needle: &'h [u8], haystack: &'h [u8]) -> PatternIter<'h> {
    PatternIter {
        finder: memmem::Finder::new(needle),
        haystack,
        position: 0,
    }
}

/// Iterator returned by [`find_pattern_iter`].
#[derive(Debug, Clone)]
pub struct PatternIter<'h> {
    finder: memmem::Finder<'h>,
    haystack: &'h [u8],
    position: usize,
}

impl Iterator for PatternIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let rest = self.haystack.get(self.position..)?;
        let found = self.finder.find(rest)?;
        let offset = self.position + found;
        self.position = offset + 1;
        Some(offset)
    }
}
