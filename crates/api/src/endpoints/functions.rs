//! Functions called by the dashboard outside the JSON API.
//!
//! Every function answers `{"success": true}` or a 400 with
//! `{"error": message}`, never the API error envelope.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    routing::post,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use wilaiety_common::AppError;
use wilaiety_core::{LogActivityInput, PasswordResetError, ResetPasswordInput};

use crate::{extractors::ClientMeta, middleware::AppState, response::FunctionReply};

async fn log_activity(
    State(state): State<AppState>,
    ClientMeta(meta): ClientMeta,
    body: Result<Json<LogActivityInput>, JsonRejection>,
) -> FunctionReply {
    let Ok(Json(input)) = body else {
        return FunctionReply::error("user_id and action are required");
    };

    match state.activity_service.log_from_function(input, &meta).await {
        Ok(()) => FunctionReply::Success,
        Err(AppError::Validation(message)) => FunctionReply::Error(message),
        Err(e) => {
            tracing::error!(error = %e, "log-activity failed");
            FunctionReply::error(FunctionReply::UNKNOWN_ERROR)
        }
    }
}

async fn reset_user_password(
    State(state): State<AppState>,
    ClientMeta(meta): ClientMeta,
    headers: HeaderMap,
    body: Result<Json<ResetPasswordInput>, JsonRejection>,
) -> FunctionReply {
    // A missing or malformed body fails the length check like an empty password.
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer);

    match state
        .password_reset_service
        .reset(bearer.as_ref().map(Bearer::token), input, &meta)
        .await
    {
        Ok(()) => FunctionReply::Success,
        Err(PasswordResetError::Unknown(e)) => {
            tracing::error!(error = %e, "reset-user-password failed");
            FunctionReply::error(FunctionReply::UNKNOWN_ERROR)
        }
        Err(e) => FunctionReply::Error(e.to_string()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/log-activity", post(log_activity))
        .route("/reset-user-password", post(reset_user_password))
}
