//! Character records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::payload::PayloadMode;
use crate::{Error, Result};

/// Avatar used when a card does not provide one.
pub const DEFAULT_AVATAR: &str = "🎭";

/// A role-play character definition decoded from a card.
///
/// The full source document is kept in [`data`](Self::data) so that fields
/// this type does not model survive a save/load cycle.
///
/// Fields are read from the top level of the document. Documents in the
/// `chara_card_v2`/`v3` layout nest them under a `data` object instead;
/// [`PayloadMode::Lenient`] falls back to that nested object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    name: String,
    avatar: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    personality: Option<String>,
    #[serde(default)]
    data: Map<String, Value>,
}

impl CharacterRecord {
    /// Create a record with just a name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let mut document = Map::new();
        document.insert("name".to_string(), Value::String(name.into()));
        Self::from_document(document)
    }

    /// Build a record from a parsed JSON value.
    ///
    /// Anything other than a JSON object is rejected as an invalid payload.
    pub fn from_value(value: Value) -> Result<Self> {
        Self::from_value_with(value, PayloadMode::Strict)
    }

    /// Build a record from a parsed JSON value using the given field lookup.
    pub fn from_value_with(value: Value, mode: PayloadMode) -> Result<Self> {
        match value {
            Value::Object(document) => Self::from_document_with(document, mode),
            other => Err(Error::InvalidPayload(format!(
                "expected a JSON object, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Build a record from a JSON object.
    pub fn from_document(document: Map<String, Value>) -> Result<Self> {
        Self::from_document_with(document, PayloadMode::Strict)
    }

    /// Build a record from a JSON object using the given field lookup.
    pub fn from_document_with(document: Map<String, Value>, mode: PayloadMode) -> Result<Self> {
        let field = |key: &str| lookup(&document, key, mode);

        let name = field("name")
            .ok_or(Error::MissingRequiredField("name"))?
            .to_string();
        let avatar = field("avatar").unwrap_or(DEFAULT_AVATAR).to_string();
        let personality = field("personality").map(str::to_string);
        let description = field("description")
            .or(personality.as_deref())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            name,
            avatar,
            description,
            personality,
            data: document,
        })
    }

    /// Character name. Never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Avatar symbol or URL.
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    /// Description, falling back to the personality text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Personality text, if the card has one.
    pub fn personality(&self) -> Option<&str> {
        self.personality.as_deref()
    }

    /// The complete source document.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consume the record and return the source document.
    pub fn into_document(self) -> Map<String, Value> {
        self.data
    }

    /// Serialize the source document as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.data).map_err(Error::Serialize)
    }
}

/// Find a non-empty string field at the top level, or under `data` when
/// lenient.
fn lookup<'a>(document: &'a Map<String, Value>, key: &str, mode: PayloadMode) -> Option<&'a str> {
    let top = non_empty_str(document.get(key));
    if top.is_some() || mode == PayloadMode::Strict {
        return top;
    }
    document
        .get("data")
        .and_then(Value::as_object)
        .and_then(|nested| non_empty_str(nested.get(key)))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
