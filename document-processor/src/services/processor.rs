use crate::models::{DocumentMetadata, ParseJob, ParsedDocument};
use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Failure kinds a processor reports instead of substituting data.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("document could not be fetched: {0}")]
    Unreachable(String),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("document could not be parsed: {0}")]
    CorruptDocument(String),

    #[error("document not found: {0}")]
    NotFound(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        let message = err.to_string();
        match err {
            ProcessingError::Unreachable(_) => AppError::BadGateway(message),
            ProcessingError::UnsupportedFormat(_) => AppError::UnsupportedMediaType(message),
            ProcessingError::CorruptDocument(_) => AppError::UnprocessableEntity(message),
            ProcessingError::NotFound(_) => AppError::NotFound(message),
        }
    }
}

/// Extraction backend behind the HTTP layer.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches and parses the document referenced by `job`.
    async fn parse(&self, job: &ParseJob) -> Result<ParsedDocument, ProcessingError>;

    /// Resolves a document id to its stored metadata.
    async fn metadata(&self, document_id: &str) -> Result<DocumentMetadata, ProcessingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn error_kinds_map_to_distinct_statuses() {
        let cases = [
            (
                ProcessingError::Unreachable("connection refused".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ProcessingError::UnsupportedFormat("xyz".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                ProcessingError::CorruptDocument("bad xref table".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ProcessingError::NotFound("doc-9".into()),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn message_carries_detail() {
        let err = AppError::from(ProcessingError::UnsupportedFormat("xyz".into()));
        assert!(matches!(err, AppError::UnsupportedMediaType(ref m) if m == "unsupported document format: xyz"));
    }
}
