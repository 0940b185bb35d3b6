//! Activity log.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use wilaiety_common::AppResult;
use wilaiety_core::DEFAULT_ACTIVITY_LIMIT;
use wilaiety_db::entities::activity_log;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ListActivityQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    DEFAULT_ACTIVITY_LIMIT
}

async fn list(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(query): Query<ListActivityQuery>,
) -> AppResult<ApiResponse<Vec<activity_log::Model>>> {
    let entries = state
        .activity_service
        .list(&principal, query.limit)
        .await?;
    Ok(ApiResponse::ok(entries))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}
