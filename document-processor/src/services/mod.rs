pub mod counter;
pub mod metrics;
pub mod mock;
pub mod processor;

pub use counter::{AtomicDocumentCounter, DocumentCounter};
pub use metrics::{init_metrics, render_metrics};
pub use mock::MockProcessor;
pub use processor::{DocumentProcessor, ProcessingError};
