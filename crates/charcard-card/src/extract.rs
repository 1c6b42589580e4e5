//! Character extraction from image containers.
//!
//! The extractor does not parse the image. It looks for the `tEXt` tag bytes
//! anywhere in the buffer, reads the big-endian length in front of the tag
//! and decodes the data region that follows. This accepts cards whose chunk
//! sequence is damaged or that use a non-PNG container carrying a PNG-style
//! text chunk.

use charcard_png::{Candidate, TagScanner};
use tracing::debug;

use crate::payload::{self, KeywordPolicy, PayloadMode};
use crate::record::CharacterRecord;
use crate::{Error, Result};

/// How to treat `tEXt` tag hits that do not decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Commit to the leftmost hit and report its failure.
    FirstMatch,
    /// Skip hits that fail to decode and keep scanning. If nothing later
    /// succeeds, the failure of the leftmost hit is reported.
    #[default]
    Resilient,
}

/// Extraction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Handling of undecodable hits.
    pub strategy: ScanStrategy,
    /// Accepted `tEXt` keywords.
    pub keyword: KeywordPolicy,
    /// Accepted payload shapes.
    pub mode: PayloadMode,
}

impl ExtractOptions {
    /// Set the scan strategy.
    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the payload mode.
    pub fn with_mode(mut self, mode: PayloadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Only accept payloads tagged with `keyword`.
    pub fn require_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = KeywordPolicy::Require(keyword.into());
        self
    }
}

/// Extract a character from an image container with default options.
///
/// # Example
///
/// ```
/// use charcard_card::{extract, Error};
///
/// let mut container = b"\x89PNG....".to_vec();
/// let payload = br#"{"name":"Aria"}"#;
/// container.extend_from_slice(&(payload.len() as u32).to_be_bytes());
/// container.extend_from_slice(b"tEXt");
/// container.extend_from_slice(payload);
///
/// let record = extract(&container)?;
/// assert_eq!(record.name(), "Aria");
///
/// assert!(matches!(extract(b"no chunk here"), Err(Error::ChunkNotFound)));
/// # Ok::<(), Error>(())
/// ```
pub fn extract(container: &[u8]) -> Result<CharacterRecord> {
    Extractor::default().extract(container)
}

/// Reusable extractor holding [`ExtractOptions`].
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the character stored in the first usable `tEXt` chunk.
    pub fn extract(&self, container: &[u8]) -> Result<CharacterRecord> {
        let mut first_error = None;

        for candidate in TagScanner::text(container) {
            match self.decode_candidate(&candidate) {
                Ok(record) => {
                    debug!(
                        tag_offset = candidate.tag_offset,
                        length = candidate.declared_length,
                        name = record.name(),
                        "extracted character"
                    );
                    return Ok(record);
                }
                Err(err) if self.options.strategy == ScanStrategy::FirstMatch => return Err(err),
                Err(err) => {
                    debug!(
                        tag_offset = candidate.tag_offset,
                        error = %err,
                        "skipping tEXt candidate"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        Err(first_error.unwrap_or(Error::ChunkNotFound))
    }

    fn decode_candidate(&self, candidate: &Candidate<'_>) -> Result<CharacterRecord> {
        let data = candidate
            .data()
            .map_err(|_| Error::MalformedContainer {
                tag_offset: candidate.tag_offset,
                declared: candidate.declared_length,
                available: candidate.available(),
            })?;

        let document = payload::decode(data, &self.options.keyword, self.options.mode)?;
        CharacterRecord::from_document_with(document, self.options.mode)
    }
}
