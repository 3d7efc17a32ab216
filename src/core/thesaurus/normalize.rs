//! Response Normalizer
//!
//! Turns the thesaurus service's loosely-structured JSON payload into strict
//! [`Entry`] records.
//!
//! Records are walked in payload order and kept while their `meta.id` equals
//! the query exactly. The walk stops at the first record that does not match:
//! later records are neither inspected nor included, even if they would match.

use serde::Deserialize;
use serde_json::Value;

use super::error::{Result, ThesaurusError};
use super::models::{Entry, Sense};

/// Upper bound on spelling suggestions quoted in an error message.
const MAX_QUOTED_SUGGESTIONS: usize = 5;

// ============================================================================
// Upstream Shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRecord {
    meta: RawMeta,
    #[serde(default)]
    fl: Option<String>,
    #[serde(default)]
    shortdef: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    id: String,
    /// Index-aligned with `shortdef`.
    #[serde(default)]
    syns: Vec<Vec<String>>,
    /// Index-aligned with `shortdef`.
    #[serde(default)]
    ants: Vec<Vec<String>>,
}

impl RawRecord {
    fn into_entry(self) -> Entry {
        let mut syns = self.meta.syns.into_iter();
        let mut ants = self.meta.ants.into_iter();

        let senses = self
            .shortdef
            .into_iter()
            .map(|definition| Sense {
                definition,
                synonyms: syns.next().unwrap_or_default(),
                antonyms: ants.next().unwrap_or_default(),
            })
            .collect();

        Entry {
            word: self.meta.id,
            label: self.fl.unwrap_or_default(),
            senses,
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a raw payload for `query`.
///
/// Fails with [`ThesaurusError::MalformedResponse`] when the payload is not an
/// array, or when an inspected record lacks a string `meta.id` or has fields
/// of the wrong type. No partial results are returned on failure.
pub fn normalize(payload: Value, query: &str) -> Result<Vec<Entry>> {
    let records = match payload {
        Value::Array(records) => records,
        other => {
            return Err(ThesaurusError::malformed(format!(
                "expected a JSON array, got {}",
                describe(&other)
            )))
        }
    };

    // Unknown words come back as a list of spelling suggestions.
    if let Some(Value::String(_)) = records.first() {
        return Err(suggestions_error(&records, query));
    }

    let mut entries = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        // An empty query matches nothing, since entry words are never empty.
        let id = record_id(&record, index)?;
        if query.is_empty() || id != query {
            break;
        }

        let raw: RawRecord = serde_json::from_value(record)
            .map_err(|e| ThesaurusError::malformed(format!("record {index}: {e}")))?;
        entries.push(raw.into_entry());
    }

    log::trace!("Normalized {} entries for '{}'", entries.len(), query);
    Ok(entries)
}

/// Parse a response body and normalize it.
pub fn normalize_body(body: &[u8], query: &str) -> Result<Vec<Entry>> {
    let payload: Value = serde_json::from_slice(body)?;
    normalize(payload, query)
}

fn record_id(record: &Value, index: usize) -> Result<&str> {
    let meta = record
        .get("meta")
        .ok_or_else(|| ThesaurusError::malformed(format!("record {index} has no `meta`")))?;

    meta.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ThesaurusError::malformed(format!("record {index} has no string `meta.id`")))
}

fn suggestions_error(records: &[Value], query: &str) -> ThesaurusError {
    let suggestions: Vec<&str> = records
        .iter()
        .filter_map(Value::as_str)
        .take(MAX_QUOTED_SUGGESTIONS)
        .collect();

    ThesaurusError::malformed(format!(
        "no thesaurus entries for '{}'; did you mean: {}?",
        query,
        suggestions.join(", ")
    ))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
