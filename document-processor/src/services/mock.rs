//! Fixed-output processor used until a real extraction backend exists.

use crate::models::{DocumentMetadata, MetadataMap, ParseJob, ParsedDocument};
use crate::services::processor::{DocumentProcessor, ProcessingError};
use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};

const SAMPLE_TEXT: &str = "Sample extracted text content from the document...";
const SAMPLE_TITLE: &str = "Sample Document";
const SAMPLE_AUTHOR: &str = "Unknown";
const SAMPLE_PAGES: u32 = 10;
const SAMPLE_SIZE: u64 = 204_800;

#[derive(Debug, Default, Clone)]
pub struct MockProcessor;

impl MockProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentProcessor for MockProcessor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn parse(&self, job: &ParseJob) -> Result<ParsedDocument, ProcessingError> {
        let mut metadata = MetadataMap::new();
        metadata.insert("title".into(), SAMPLE_TITLE.into());
        metadata.insert("author".into(), SAMPLE_AUTHOR.into());
        metadata.insert(
            "created".into(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true).into(),
        );
        metadata.insert("format".into(), job.format.clone().into());

        Ok(ParsedDocument {
            text: SAMPLE_TEXT.to_string(),
            pages: SAMPLE_PAGES,
            metadata,
        })
    }

    async fn metadata(&self, document_id: &str) -> Result<DocumentMetadata, ProcessingError> {
        let now = Utc::now();

        Ok(DocumentMetadata {
            id: document_id.to_string(),
            title: SAMPLE_TITLE.to_string(),
            author: SAMPLE_AUTHOR.to_string(),
            format: "pdf".to_string(),
            pages: SAMPLE_PAGES,
            created: now - Duration::hours(24),
            modified: now,
            size: SAMPLE_SIZE,
            extra: None,
        })
    }
}
