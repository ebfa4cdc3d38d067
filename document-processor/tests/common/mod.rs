#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use document_processor::config::DocumentConfig;
use document_processor::lifecycle::{ServerState, ShutdownOutcome};
use document_processor::models::{DocumentMetadata, ParseJob, ParsedDocument};
use document_processor::services::{
    DocumentCounter, DocumentProcessor, MockProcessor, ProcessingError,
};
use document_processor::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Router over the given processor with the lifecycle pinned to Listening.
pub fn test_router(processor: Arc<dyn DocumentProcessor>) -> (Router, Arc<dyn DocumentCounter>) {
    test_router_with(DocumentConfig::ephemeral(), processor)
}

pub fn test_router_with(
    config: DocumentConfig,
    processor: Arc<dyn DocumentProcessor>,
) -> (Router, Arc<dyn DocumentCounter>) {
    let (_tx, rx) = watch::channel(ServerState::Listening);
    let state = AppState::new(config, processor, None, rx);
    let counter = state.documents_processed.clone();
    (build_router(state), counter)
}

pub fn mock_router() -> (Router, Arc<dyn DocumentCounter>) {
    test_router(Arc::new(MockProcessor::new()))
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}

pub fn post_parse(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/documents/parse")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Processor that takes `delay` to parse.
pub struct SlowProcessor {
    pub delay: Duration,
}

#[async_trait]
impl DocumentProcessor for SlowProcessor {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn parse(&self, job: &ParseJob) -> Result<ParsedDocument, ProcessingError> {
        tokio::time::sleep(self.delay).await;
        MockProcessor::new().parse(job).await
    }

    async fn metadata(&self, document_id: &str) -> Result<DocumentMetadata, ProcessingError> {
        MockProcessor::new().metadata(document_id).await
    }
}

/// Processor whose every call fails with the error built by `make`.
pub struct FailingProcessor {
    pub make: fn() -> ProcessingError,
}

#[async_trait]
impl DocumentProcessor for FailingProcessor {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn parse(&self, _job: &ParseJob) -> Result<ParsedDocument, ProcessingError> {
        Err((self.make)())
    }

    async fn metadata(&self, _document_id: &str) -> Result<DocumentMetadata, ProcessingError> {
        Err((self.make)())
    }
}

/// A live server on an ephemeral port.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub lifecycle: watch::Receiver<ServerState>,
    pub documents_processed: Arc<dyn DocumentCounter>,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<Result<ShutdownOutcome, AppError>>,
}

impl TestApp {
    pub async fn spawn(processor: Arc<dyn DocumentProcessor>, shutdown_grace: Duration) -> Self {
        let mut config = DocumentConfig::ephemeral();
        config.server.shutdown_grace = shutdown_grace;

        let app = Application::build(config, processor, None)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let lifecycle = app.lifecycle();
        let documents_processed = app.documents_processed();

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(app.run_until_stopped(async {
            let _ = rx.await;
        }));

        let address = format!("http://127.0.0.1:{}", port);

        // Wait until the server is accepting
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            lifecycle,
            documents_processed,
            shutdown: Some(tx),
            server,
        }
    }

    /// Sends the termination signal without waiting for the drain.
    pub fn trigger_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    pub async fn shutdown(mut self) -> ShutdownOutcome {
        self.trigger_shutdown();
        self.server
            .await
            .expect("Server task panicked")
            .expect("Server returned an error")
    }
}
