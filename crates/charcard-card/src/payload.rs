//! Decoding of text chunk payloads into JSON documents.
//!
//! The data of a `tEXt` chunk is `keyword NUL text`. The keyword is Latin-1
//! and optional; the text must be UTF-8. Accepted text shapes:
//!
//! - JSON: `{"name": ...}`, always
//! - base64 of JSON: `eyJuYW1lIjog...`, only in [`PayloadMode::Lenient`]
//!
//! JSON text cannot contain a raw NUL, so splitting on the first one is
//! unambiguous.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use charcard_png::TextChunk;
use serde_json::{Map, Value};

use crate::record::value_kind;
use crate::{Error, Result};

/// Which `tEXt` keywords are accepted as character data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeywordPolicy {
    /// Accept any keyword, or none at all.
    #[default]
    Any,
    /// Only accept payloads tagged with this keyword.
    Require(String),
}

impl KeywordPolicy {
    fn check(&self, keyword: Option<&str>) -> Result<()> {
        match self {
            Self::Any => Ok(()),
            Self::Require(expected) if keyword == Some(expected.as_str()) => Ok(()),
            Self::Require(expected) => Err(Error::InvalidPayload(match keyword {
                Some(found) => format!("expected keyword {expected:?}, found {found:?}"),
                None => format!("expected keyword {expected:?}, found none"),
            })),
        }
    }
}

/// How much a payload may depart from a plain JSON object with top-level
/// fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadMode {
    /// JSON text with `name` and friends at the top level.
    #[default]
    Strict,
    /// Also accept base64-wrapped JSON and fields nested under `data`, as
    /// written by `chara_card_v2`/`v3` card editors.
    Lenient,
}

/// Decode a chunk data region into a JSON object.
pub fn decode(bytes: &[u8], policy: &KeywordPolicy, mode: PayloadMode) -> Result<Map<String, Value>> {
    let chunk = TextChunk::parse(bytes);
    policy.check(chunk.keyword_lossy().as_deref())?;

    let text = std::str::from_utf8(chunk.text)?;
    parse_object(text, mode)
}

/// Parse text as a JSON object. Lenient mode retries as base64.
pub fn parse_object(body: &str, mode: PayloadMode) -> Result<Map<String, Value>> {
    let body = body.trim_start_matches('\u{feff}').trim();

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(json_err) => match decode_base64(body, mode) {
            Some(decoded) => {
                let text = std::str::from_utf8(&decoded).map_err(|e| {
                    Error::InvalidPayload(format!("base64 payload is not UTF-8: {e}"))
                })?;
                serde_json::from_str(text.trim())
                    .map_err(|e| Error::InvalidPayload(format!("base64 payload: {e}")))?
            }
            None => return Err(Error::InvalidPayload(json_err.to_string())),
        },
    };

    match value {
        Value::Object(document) => Ok(document),
        other => Err(Error::InvalidPayload(format!(
            "expected a JSON object, found {}",
            value_kind(&other)
        ))),
    }
}

fn decode_base64(body: &str, mode: PayloadMode) -> Option<Vec<u8>> {
    let looks_like_base64 = mode == PayloadMode::Lenient
        && !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='));
    if !looks_like_base64 {
        return None;
    }

    STANDARD
        .decode(body)
        .or_else(|_| STANDARD_NO_PAD.decode(body))
        .ok()
}
