use crate::error::respond_error;
use axum::http::{StatusCode, header};
use axum::{extract::Request, middleware::Next, response::Response};

/// Rewrites error responses produced outside the handlers (timeouts, method
/// mismatches, extractor rejections) into the JSON error envelope.
pub async fn error_envelope_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    tracing::debug!(status = status.as_u16(), "Wrapping non-JSON error response");

    let mut wrapped = respond_error(message_for(status), status);
    if let Some(allow) = response.headers().get(header::ALLOW) {
        wrapped.headers_mut().insert(header::ALLOW, allow.clone());
    }
    wrapped
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn message_for(status: StatusCode) -> String {
    match status {
        StatusCode::REQUEST_TIMEOUT => "request timed out".to_string(),
        StatusCode::PAYLOAD_TOO_LARGE => "request body too large".to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_lowercase(),
    }
}
