//! User administration.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use wilaiety_common::AppResult;
use wilaiety_core::{Role, UserSummary};

use crate::{
    extractors::{AuthUser, ClientMeta},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SetRoleResponse {
    pub user_id: String,
    pub role: Role,
}

async fn list(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<ApiResponse<Vec<UserSummary>>> {
    let users = state.user_service.list_users(&principal).await?;
    Ok(ApiResponse::ok(users))
}

async fn set_role(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    Path(user_id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> AppResult<ApiResponse<SetRoleResponse>> {
    let role = state
        .user_service
        .set_role(&principal, &user_id, req.role, &meta)
        .await?;
    Ok(ApiResponse::ok(SetRoleResponse { user_id, role }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}/role", put(set_role))
}
