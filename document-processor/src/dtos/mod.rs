pub mod documents;
pub mod health;

pub use documents::{MetadataResponse, ParseRequest, ParseResponse};
pub use health::{HealthResponse, ReadinessResponse};
