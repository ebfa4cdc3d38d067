use crate::models::{document::DEFAULT_FORMAT, DocumentMetadata, MetadataMap, ParseJob, ParsedDocument};
use chrono::SecondsFormat;
use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl ParseRequest {
    /// Decodes a request body. Only a JSON object is accepted; a bare `null`
    /// reads as an empty request so it fails field validation instead.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice(body)? {
            Value::Null => Ok(Self::default()),
            value @ Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde_json::Error::custom("expected a JSON object")),
        }
    }

    /// Validates the request and applies the default format.
    pub fn into_job(self) -> Result<ParseJob, AppError> {
        let file_url = self
            .file_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::BadRequest("file_url is required".to_string()))?;

        let format = self
            .format
            .filter(|format| !format.is_empty())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        Ok(ParseJob { file_url, format })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub text: String,
    pub pages: u32,
    pub metadata: MetadataMap,
}

impl From<ParsedDocument> for ParseResponse {
    fn from(doc: ParsedDocument) -> Self {
        Self {
            text: doc.text,
            pages: doc.pages,
            metadata: doc.metadata,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub format: String,
    pub pages: u32,
    pub created: String,
    pub modified: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<MetadataMap>,
}

impl From<DocumentMetadata> for MetadataResponse {
    fn from(doc: DocumentMetadata) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            author: doc.author,
            format: doc.format,
            pages: doc.pages,
            created: doc.created.to_rfc3339_opts(SecondsFormat::Secs, true),
            modified: doc.modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            size: doc.size,
            extra: doc.extra,
        }
    }
}
