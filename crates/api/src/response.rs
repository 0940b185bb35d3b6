//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response of a `/functions/v1` call.
///
/// Functions answer `{"success": true}` or `{"error": message}` with 400,
/// whatever went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionReply {
    Success,
    Error(String),
}

impl FunctionReply {
    /// Generic message for failures the caller cannot act on.
    pub const UNKNOWN_ERROR: &'static str = "Unknown error";

    /// Failure with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

impl IntoResponse for FunctionReply {
    fn into_response(self) -> Response {
        match self {
            Self::Success => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
            Self::Error(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

