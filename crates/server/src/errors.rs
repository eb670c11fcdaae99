use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::ServiceError;
use tracing::{debug, error};

/// Error body every failing request is answered with: `{ "status", "message" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub status: u16,
    pub message: String,
}

impl RpcError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST.as_u16(), message)
    }
}

impl From<ServiceError> for RpcError {
    fn from(e: ServiceError) -> Self {
        match e.tagged() {
            Some((status, message)) => Self::new(status, message),
            None => Self::bad_request(e.to_string()),
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rej: JsonRejection) -> Self { Self::bad_request(rej.body_text()) }
}

impl From<QueryRejection> for RpcError {
    fn from(rej: QueryRejection) -> Self { Self::bad_request(rej.body_text()) }
}

impl From<PathRejection> for RpcError {
    fn from(rej: PathRejection) -> Self { Self::bad_request(rej.body_text()) }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        // Statuses outside the HTTP range are answered as a plain 400.
        let (code, body) = match StatusCode::from_u16(self.status) {
            Ok(code) => (code, self),
            Err(_) => (StatusCode::BAD_REQUEST, RpcError::bad_request(self.message)),
        };
        if code.is_server_error() {
            error!(status = body.status, message = %body.message, "request failed");
        } else {
            debug!(status = body.status, message = %body.message, "request rejected");
        }
        (code, Json(body)).into_response()
    }
}
