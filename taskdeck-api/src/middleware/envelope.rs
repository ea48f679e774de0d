/// Error envelope stamping
///
/// `ApiError` serializes the full error envelope except `path`, which only
/// the request knows. This middleware buffers error responses, fills in the
/// path, and rewraps anything that isn't already an envelope (axum's own
/// rejections for malformed JSON, unknown routes, and the auth extractor's
/// plain-text rejections) so every error leaves the server in the same
/// shape.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;

/// Error bodies are small; anything larger is passed through untouched.
const MAX_BUFFERED_ERROR_BYTES: usize = 64 * 1024;

/// Buffers error responses and stamps the request path into the envelope
pub async fn stamp_error_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_BUFFERED_ERROR_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    let envelope = match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(mut envelope) => {
            envelope.path = path;
            envelope
        }
        // Not one of ours: wrap the raw rejection text
        Err(_) => ErrorBody::new(
            status,
            path,
            String::from_utf8_lossy(&bytes).trim().to_string(),
        ),
    };

    (status, Json(envelope)).into_response()
}
