//! Prometheus export for the /metrics endpoint.

use crate::services::counter::DocumentCounter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt::Write;

pub const DOCUMENTS_PROCESSED: &str = "documents_processed_total";

/// Installs the global Prometheus recorder and returns its handle.
///
/// Only one recorder can exist per process; a second call fails.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))
}

/// Renders the recorder's metrics followed by the processed-documents counter.
pub fn render_metrics(handle: Option<&PrometheusHandle>, counter: &dyn DocumentCounter) -> String {
    let mut body = handle.map(|h| h.render()).unwrap_or_default();

    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let _ = writeln!(
        body,
        "# HELP {name} Documents processed successfully.\n# TYPE {name} counter\n{name} {value}",
        name = DOCUMENTS_PROCESSED,
        value = counter.snapshot()
    );

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::counter::AtomicDocumentCounter;

    #[test]
    fn renders_counter_without_recorder() {
        let counter = AtomicDocumentCounter::new();
        counter.increment();
        counter.increment();

        let body = render_metrics(None, &counter);
        assert!(body.contains("# TYPE documents_processed_total counter"));
        assert!(body.lines().any(|line| line == "documents_processed_total 2"));
    }
}
