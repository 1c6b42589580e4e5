//! Writing character records into PNG files.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use charcard_png::embed_text_chunk;

use crate::record::CharacterRecord;
use crate::Result;

/// Keyword conventionally used for character card payloads.
pub const DEFAULT_KEYWORD: &str = "chara";

/// How the JSON document is stored in the text chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// The UTF-8 JSON text itself.
    #[default]
    Raw,
    /// Base64 of the UTF-8 JSON, as other card tools write it. Reading it
    /// back needs [`PayloadMode::Lenient`](crate::PayloadMode::Lenient).
    Base64,
}

/// Embed a record's document into a PNG under `keyword`.
///
/// Any existing `tEXt` chunk with the same keyword is replaced.
pub fn embed_record(
    png: &[u8],
    record: &CharacterRecord,
    keyword: &str,
    encoding: PayloadEncoding,
) -> Result<Vec<u8>> {
    let json = record.to_json()?;
    let text = match encoding {
        PayloadEncoding::Base64 => STANDARD.encode(json),
        PayloadEncoding::Raw => json,
    };
    Ok(embed_text_chunk(png, keyword, &text)?)
}
