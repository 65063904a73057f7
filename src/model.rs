use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::GenerationError;

/// A resolved lexical entry for one headword.
///
/// Every required field is present and non-blank. Deserializing goes through
/// the same validation as [`parse_word_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWordRecord")]
pub struct WordRecord {
    pub word: String,
    pub word_class: String,
    pub definition: String,
    pub etymology: String,
    pub usage_example: String,
    pub inflections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
}

/// A render-ready fragment of etymology text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum EtymologyBlock {
    Paragraph(String),
    ListItem(String),
}

impl EtymologyBlock {
    pub fn text(&self) -> &str {
        match self {
            EtymologyBlock::Paragraph(text) | EtymologyBlock::ListItem(text) => text,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, EtymologyBlock::ListItem(_))
    }
}

/// Wire shape of a generated record before validation. Fields are kept as
/// raw JSON so a missing or mistyped field becomes a typed error naming it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWordRecord {
    word: Option<Value>,
    word_class: Option<Value>,
    definition: Option<Value>,
    etymology: Option<Value>,
    usage_example: Option<Value>,
    inflections: Option<Value>,
    fun_fact: Option<Value>,
}

impl TryFrom<RawWordRecord> for WordRecord {
    type Error = GenerationError;

    fn try_from(raw: RawWordRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            word: required(raw.word, "word")?,
            word_class: required(raw.word_class, "wordClass")?,
            definition: required(raw.definition, "definition")?,
            etymology: required(raw.etymology, "etymology")?,
            usage_example: required(raw.usage_example, "usageExample")?,
            inflections: inflections(raw.inflections)?,
            fun_fact: optional(raw.fun_fact, "funFact")?,
        })
    }
}

fn required(value: Option<Value>, field: &'static str) -> Result<String, GenerationError> {
    optional(value, field)?.ok_or(GenerationError::InvalidRecord { field })
}

/// Absent, null and blank all read as `None`; any non-string is rejected.
fn optional(value: Option<Value>, field: &'static str) -> Result<Option<String>, GenerationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let text = text.trim();
            Ok((!text.is_empty()).then(|| text.to_string()))
        }
        Some(_) => Err(GenerationError::InvalidRecord { field }),
    }
}

fn inflections(value: Option<Value>) -> Result<Vec<String>, GenerationError> {
    const FIELD: &str = "inflections";
    let Some(Value::Array(items)) = value else {
        return Err(GenerationError::InvalidRecord { field: FIELD });
    };
    let mut forms = Vec::with_capacity(items.len());
    for item in items {
        if let Some(form) = optional(Some(item), FIELD)? {
            forms.push(form);
        }
    }
    Ok(forms)
}

/// Decodes and validates the JSON body returned by a structured text
/// generation call.
pub fn parse_word_record(body: &str) -> Result<WordRecord, GenerationError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let raw: RawWordRecord = serde_json::from_str(trimmed)?;
    WordRecord::try_from(raw)
}
