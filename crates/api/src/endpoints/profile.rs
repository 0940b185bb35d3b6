//! The caller's own profile.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use wilaiety_common::AppResult;
use wilaiety_core::{UpdateProfileInput, UserProfile};
use wilaiety_db::entities::profile;

use super::read_image_upload;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn show(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile(&principal.user_id).await?;
    Ok(ApiResponse::ok(profile))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<profile::Model>> {
    let profile = state
        .user_service
        .update_profile(&principal.user_id, input)
        .await?;
    Ok(ApiResponse::ok(profile))
}

async fn upload_avatar(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<profile::Model>> {
    let upload = read_image_upload(multipart).await?;
    let profile = state
        .user_service
        .upload_avatar(
            &principal.user_id,
            &upload.data,
            &upload.file_name,
            &upload.content_type,
        )
        .await?;
    Ok(ApiResponse::ok(profile))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show).patch(update))
        .route("/avatar", post(upload_avatar))
}
