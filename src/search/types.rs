//! Wire types for the search endpoint.
//!
//! The endpoint speaks bleve's search request/response JSON. Only the parts
//! the gallery uses are modelled; unknown response keys are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Comma-separated tag list
pub const SUBJECT_FIELD: &str = "XMP:Subject";
/// Star rating
pub const RATING_FIELD: &str = "XMP:Rating";

/// Fields requested for every hit
pub const RESULT_FIELDS: [&str; 2] = [SUBJECT_FIELD, RATING_FIELD];
/// Stable ordering by document id
pub const SORT_ORDER: [&str; 1] = ["_id"];

/// Empty object marker for `{"match_all": {}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAll {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Query {
    /// Free text query string
    Text { query: String },
    /// Everything in the index
    MatchAll { match_all: MatchAll },
}

impl Query {
    /// Blank input means "show everything".
    pub fn from_input(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Query::MatchAll {
                match_all: MatchAll {},
            }
        } else {
            Query::Text {
                query: text.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub size: usize,
    pub query: Query,
    pub fields: Vec<String>,
    pub sort: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hit {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, Value>,
}

impl Hit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Tags from the subject field. Accepts a comma-separated string or an
    /// array of strings; anything else is no tags.
    pub fn tags(&self) -> Vec<String> {
        match self.fields.get(SUBJECT_FIELD) {
            Some(Value::String(s)) => split_tags(s),
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str())
                .flat_map(split_tags)
                .collect(),
            _ => vec![],
        }
    }

    pub fn rating(&self) -> Option<i64> {
        match self.fields.get(RATING_FIELD)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub total_hits: u64,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
