use crate::dtos::{MetadataResponse, ParseRequest, ParseResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::BytesRejection, Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use service_core::error::AppError;

pub async fn parse_document(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map_err(|rejection| {
        tracing::error!(error = %rejection, "Failed to read request body");
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge("request body too large".to_string())
            }
            _ => AppError::BadRequest("Invalid request body".to_string()),
        }
    })?;

    let request = ParseRequest::decode(&body).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode request");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let job = request.into_job()?;

    tracing::info!(
        file_url = %job.file_url,
        format = %job.format,
        processor = state.processor.name(),
        "Processing document parse request"
    );

    let parsed = state.processor.parse(&job).await.map_err(|e| {
        tracing::warn!(file_url = %job.file_url, error = %e, "Document processing failed");
        AppError::from(e)
    })?;

    state.documents_processed.increment();

    Ok(Json(ParseResponse::from(parsed)))
}

pub async fn get_metadata(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if document_id.trim().is_empty() {
        return Err(missing_document_id());
    }

    tracing::info!(document_id = %document_id, "Processing metadata retrieval request");

    let metadata = state.processor.metadata(&document_id).await?;

    Ok(Json(MetadataResponse::from(metadata)))
}

/// Fallback for unmatched routes. An empty id segment in a metadata path
/// never reaches [`get_metadata`], so it is rejected here.
pub async fn not_found(uri: Uri) -> AppError {
    if is_metadata_path_without_id(uri.path()) {
        return missing_document_id();
    }

    AppError::NotFound("not found".to_string())
}

fn missing_document_id() -> AppError {
    AppError::BadRequest("document id is required".to_string())
}

fn is_metadata_path_without_id(path: &str) -> bool {
    let path = path.strip_prefix("/api/v1").unwrap_or(path);
    matches!(
        path.trim_end_matches('/'),
        "/documents//metadata" | "/documents/metadata"
    )
}
