pub mod document;

pub use document::{DocumentMetadata, MetadataMap, MetadataValue, ParseJob, ParsedDocument};
