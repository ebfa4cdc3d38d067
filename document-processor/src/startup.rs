use crate::config::DocumentConfig;
use crate::handlers;
use crate::lifecycle::{ServerState, ShutdownOutcome};
use crate::services::{AtomicDocumentCounter, DocumentCounter, DocumentProcessor};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    error_envelope_middleware, metrics_middleware, request_id_middleware,
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: DocumentConfig,
    pub processor: Arc<dyn DocumentProcessor>,
    pub documents_processed: Arc<dyn DocumentCounter>,
    pub metrics: Option<PrometheusHandle>,
    pub lifecycle: watch::Receiver<ServerState>,
    /// Cancelled when the drain outlives the grace period.
    pub forced_shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: DocumentConfig,
        processor: Arc<dyn DocumentProcessor>,
        metrics: Option<PrometheusHandle>,
        lifecycle: watch::Receiver<ServerState>,
    ) -> Self {
        Self {
            config,
            processor,
            documents_processed: Arc::new(AtomicDocumentCounter::new()),
            metrics,
            lifecycle,
            forced_shutdown: CancellationToken::new(),
        }
    }
}

/// Drops the handler future once a forced shutdown is declared, so work still
/// running past the grace period never completes.
async fn abandon_on_forced_shutdown(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    tokio::select! {
        response = next.run(request) => response,
        _ = state.forced_shutdown.cancelled() => {
            tracing::warn!("Abandoning in-flight request");
            AppError::ServiceUnavailable.into_response()
        }
    }
}

fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents/parse", post(handlers::parse_document))
        .route("/documents/:id/metadata", get(handlers::get_metadata))
}

pub fn build_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(document_routes())
        .nest("/api/v1", document_routes())
        .fallback(handlers::not_found)
        .layer(RequestBodyTimeoutLayer::new(server.read_timeout))
        .layer(TimeoutLayer::new(server.write_timeout))
        .layer(middleware::from_fn(error_envelope_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            abandon_on_forced_shutdown,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
    lifecycle: watch::Sender<ServerState>,
    shutdown_grace: Duration,
}

impl Application {
    /// Binds the listener and wires the router. A bind failure is returned
    /// to the caller, which treats it as fatal.
    pub async fn build(
        config: DocumentConfig,
        processor: Arc<dyn DocumentProcessor>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        let (lifecycle, lifecycle_rx) = watch::channel(ServerState::Stopped);
        lifecycle.send_replace(ServerState::Starting);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(address = %addr, error = %e, "Server failed to start");
            lifecycle.send_replace(ServerState::Stopped);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let shutdown_grace = config.server.shutdown_grace;
        let state = AppState::new(config, processor, metrics, lifecycle_rx);
        let router = build_router(state.clone());

        Ok(Self {
            port,
            listener,
            router,
            state,
            lifecycle,
            shutdown_grace,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn documents_processed(&self) -> Arc<dyn DocumentCounter> {
        self.state.documents_processed.clone()
    }

    pub fn lifecycle(&self) -> watch::Receiver<ServerState> {
        self.lifecycle.subscribe()
    }

    /// Serves until `signal` resolves, then drains in-flight requests for at
    /// most the grace period.
    pub async fn run_until_stopped<F>(self, signal: F) -> Result<ShutdownOutcome, AppError>
    where
        F: Future<Output = ()> + Send,
    {
        let Application {
            port,
            listener,
            router,
            state,
            lifecycle,
            shutdown_grace,
        } = self;

        let drain = CancellationToken::new();
        let server = axum::serve(listener, router)
            .with_graceful_shutdown(drain.clone().cancelled_owned());
        let mut server = tokio::spawn(server.into_future());

        lifecycle.send_replace(ServerState::Listening);
        tracing::info!(port, "Server listening on port {}", port);

        tokio::select! {
            joined = &mut server => {
                lifecycle.send_replace(ServerState::Stopped);
                return Err(match joined {
                    Ok(Ok(())) => AppError::InternalError(anyhow::anyhow!("server stopped without a shutdown request")),
                    Ok(Err(e)) => AppError::from(e),
                    Err(e) => AppError::InternalError(anyhow::Error::new(e)),
                });
            }
            _ = signal => {}
        }

        lifecycle.send_replace(ServerState::Draining);
        tracing::info!(
            grace_period_secs = shutdown_grace.as_secs_f64(),
            "Shutting down server..."
        );
        drain.cancel();

        let outcome = match tokio::time::timeout(shutdown_grace, &mut server).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("Server exited gracefully");
                ShutdownOutcome::Clean
            }
            Ok(Ok(Err(e))) => {
                lifecycle.send_replace(ServerState::Stopped);
                return Err(AppError::from(e));
            }
            Ok(Err(e)) => {
                lifecycle.send_replace(ServerState::Stopped);
                return Err(AppError::InternalError(anyhow::Error::new(e)));
            }
            Err(_) => {
                state.forced_shutdown.cancel();
                server.abort();
                tracing::warn!(
                    grace_period_secs = shutdown_grace.as_secs_f64(),
                    "Server forced to shutdown"
                );
                ShutdownOutcome::Forced
            }
        };

        lifecycle.send_replace(ServerState::Stopped);
        Ok(outcome)
    }
}
