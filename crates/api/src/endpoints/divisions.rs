//! Administrative division endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use wilaiety_common::AppResult;
use wilaiety_core::{CreateDivisionInput, UpdateDivisionInput};
use wilaiety_db::entities::administrative_division::{self, DivisionType};
use wilaiety_db::repositories::DivisionFilter;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Default, Deserialize)]
pub struct ListDivisionsQuery {
    pub division_type: Option<DivisionType>,
    pub parent_id: Option<String>,
    /// Only divisions without a parent. Ignored when `parent_id` is set.
    #[serde(default)]
    pub top_level: bool,
    #[serde(default)]
    pub active_only: bool,
}

impl ListDivisionsQuery {
    fn filter(self) -> DivisionFilter {
        let parent_id = match (self.parent_id, self.top_level) {
            (Some(parent), _) => Some(Some(parent)),
            (None, true) => Some(None),
            (None, false) => None,
        };
        DivisionFilter {
            division_type: self.division_type,
            parent_id,
            active_only: self.active_only,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Query(query): Query<ListDivisionsQuery>,
) -> AppResult<ApiResponse<Vec<administrative_division::Model>>> {
    let divisions = state.division_service.list(&query.filter()).await?;
    Ok(ApiResponse::ok(divisions))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<administrative_division::Model>> {
    let division = state.division_service.get(&id).await?;
    Ok(ApiResponse::ok(division))
}

async fn children(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<administrative_division::Model>>> {
    let divisions = state.division_service.children(&id).await?;
    Ok(ApiResponse::ok(divisions))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<CreateDivisionInput>,
) -> AppResult<ApiResponse<administrative_division::Model>> {
    let division = state.division_service.create(&principal, input).await?;
    Ok(ApiResponse::ok(division))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateDivisionInput>,
) -> AppResult<ApiResponse<administrative_division::Model>> {
    let division = state
        .division_service
        .update(&principal, &id, input)
        .await?;
    Ok(ApiResponse::ok(division))
}

async fn set_active(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<ApiResponse<administrative_division::Model>> {
    let division = state
        .division_service
        .set_active(&principal, &id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(division))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update))
        .route("/{id}/children", get(children))
        .route("/{id}/active", put(set_active))
}
