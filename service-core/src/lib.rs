//! service-core: shared HTTP infrastructure for the document services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
