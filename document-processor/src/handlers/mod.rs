pub mod documents;
pub mod health;

pub use documents::{get_metadata, not_found, parse_document};
pub use health::{health_check, metrics_endpoint, readiness_check};
