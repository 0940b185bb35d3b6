//! API endpoints.

mod activity;
mod auth;
mod divisions;
mod facilities;
pub mod functions;
mod licenses;
pub(crate) mod meta;
mod profile;
mod reports;
mod users;

use axum::{Router, extract::Multipart};
use wilaiety_common::{AppError, AppResult};

use crate::middleware::AppState;

/// Create the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/meta", meta::router())
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/users", users::router())
        .nest("/facilities", facilities::router())
        .nest("/sectors", facilities::sector_router())
        .nest("/licenses", licenses::router())
        .nest("/divisions", divisions::router())
        .nest("/activity-logs", activity::router())
        .nest("/reports", reports::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

/// An image received through a multipart form.
pub(crate) struct ImageUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Read the `file` field of a multipart upload.
pub(crate) async fn read_image_upload(mut multipart: Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .to_vec();

        return Ok(ImageUpload {
            data,
            file_name,
            content_type,
        });
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
