//! License endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use wilaiety_common::AppResult;
use wilaiety_core::{CreateLicenseInput, LicenseView};
use wilaiety_db::entities::license::LicenseStatus;
use wilaiety_db::repositories::LicenseFilter;

use crate::{
    extractors::{AuthUser, ClientMeta},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListLicensesQuery {
    pub facility_id: Option<String>,
    pub status: Option<LicenseStatus>,
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Query(query): Query<ListLicensesQuery>,
) -> AppResult<ApiResponse<Vec<LicenseView>>> {
    let filter = LicenseFilter {
        facility_id: query.facility_id,
        status: query.status,
    };
    let licenses = state.license_service.list(&filter).await?;
    Ok(ApiResponse::ok(licenses))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LicenseView>> {
    let license = state.license_service.get(&id).await?;
    Ok(ApiResponse::ok(license))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<CreateLicenseInput>,
) -> AppResult<ApiResponse<LicenseView>> {
    let license = state
        .license_service
        .create(&principal, input, &meta)
        .await?;
    Ok(ApiResponse::ok(license))
}

async fn delete(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.license_service.delete(&principal, &id, &meta).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
}
