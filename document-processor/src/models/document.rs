use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_FORMAT: &str = "pdf";

pub type MetadataMap = BTreeMap<String, MetadataValue>;

/// A metadata value as it appears in JSON: a scalar or a nested mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Map(MetadataMap),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<MetadataMap> for MetadataValue {
    fn from(value: MetadataMap) -> Self {
        MetadataValue::Map(value)
    }
}

/// A validated parse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJob {
    pub file_url: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub text: String,
    pub pages: u32,
    pub metadata: MetadataMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub id: String,
    pub title: String,
    pub author: String,
    pub format: String,
    pub pages: u32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub size: u64,
    pub extra: Option<MetadataMap>,
}
