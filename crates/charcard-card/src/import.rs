//! File-level import of character cards.
//!
//! A card file is either an image with an embedded `tEXt` payload or a plain
//! JSON document. Both paths apply the same validation and defaulting.

use std::fs;
use std::path::Path;

use charcard_png::is_png;
use tracing::debug;

use crate::extract::{ExtractOptions, Extractor};
use crate::payload::{self, PayloadMode};
use crate::record::CharacterRecord;
use crate::{Error, Result};

/// Extensions treated as image containers.
const IMAGE_EXTENSIONS: &[&str] = &["png", "apng", "webp", "jpg", "jpeg", "gif"];

/// The kind of file a card is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSource {
    /// Image container, decoded with the chunk scanner.
    Image,
    /// Plain JSON document.
    Json,
}

impl CardSource {
    /// Decide how to read a card.
    ///
    /// Content wins over the file name: a PNG signature means an image, a
    /// leading `{` means JSON. Otherwise the extension decides.
    pub fn detect(path: Option<&Path>, bytes: &[u8]) -> Result<Self> {
        if is_png(bytes) {
            return Ok(Self::Image);
        }

        let first = bytes
            .strip_prefix(b"\xEF\xBB\xBF")
            .unwrap_or(bytes)
            .iter()
            .find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            return Ok(Self::Json);
        }

        match path {
            Some(path) => Self::from_path(path),
            None => Err(Error::UnsupportedFormat(
                "unrecognized content without a file name".to_string(),
            )),
        }
    }

    /// Decide how to read a card from its file extension alone.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => Ok(Self::Image),
            Some(ext) => Err(Error::UnsupportedFormat(format!(".{ext} file"))),
            None => Err(Error::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
        }
    }
}

/// Import a character from a JSON document.
pub fn import_json(bytes: &[u8]) -> Result<CharacterRecord> {
    import_json_with(bytes, PayloadMode::Strict)
}

/// Import a character from a JSON document in the given payload mode.
///
/// Applies the same decoding and validation as a `tEXt` payload without a
/// keyword.
pub fn import_json_with(bytes: &[u8], mode: PayloadMode) -> Result<CharacterRecord> {
    let text = std::str::from_utf8(bytes)?;
    let document = payload::parse_object(text, mode)?;
    CharacterRecord::from_document_with(document, mode)
}

/// Import a character from in-memory file contents.
///
/// `path` is only used for format detection.
pub fn import_bytes(
    path: Option<&Path>,
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<CharacterRecord> {
    let source = CardSource::detect(path, bytes)?;
    debug!(?source, size = bytes.len(), "importing card");

    match source {
        CardSource::Image => Extractor::new(options.clone()).extract(bytes),
        CardSource::Json => import_json_with(bytes, options.mode),
    }
}

/// Read and import a card file.
pub fn import_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<CharacterRecord> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    import_bytes(Some(path), &bytes, options)
}
