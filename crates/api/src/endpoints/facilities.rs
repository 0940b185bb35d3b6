//! Facility endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use wilaiety_common::AppResult;
use wilaiety_core::labels::{self, Label};
use wilaiety_core::{
    CreateFacilityInput, FacilityPage, MapPoint, StatusBadge, UpdateFacilityInput, status_badge,
};
use wilaiety_db::entities::facility::{self, FacilityStatus, Jurisdiction, Sector};
use wilaiety_db::repositories::FacilityFilter;

use super::read_image_upload;
use crate::{
    extractors::{AuthUser, ClientMeta, RequestLang},
    middleware::AppState,
    response::ApiResponse,
};

/// Query string of the facility list.
#[derive(Debug, Default, Deserialize)]
pub struct ListFacilitiesQuery {
    pub search: Option<String>,
    pub sector: Option<Sector>,
    pub status: Option<FacilityStatus>,
    pub jurisdiction: Option<Jurisdiction>,
    pub division_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListFacilitiesQuery {
    fn filter(&self) -> FacilityFilter {
        FacilityFilter {
            search: self.search.clone(),
            sector: self.sector,
            status: self.status,
            jurisdiction: self.jurisdiction,
            division_id: self.division_id.clone(),
        }
    }
}

/// A facility with its display labels.
#[derive(Debug, Serialize)]
pub struct FacilityResponse {
    #[serde(flatten)]
    pub facility: facility::Model,
    pub sector_label: Label,
    pub status_badge: StatusBadge,
}

impl From<facility::Model> for FacilityResponse {
    fn from(facility: facility::Model) -> Self {
        Self {
            sector_label: labels::sector(facility.sector),
            status_badge: status_badge(facility.status),
            facility,
        }
    }
}

async fn list(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Query(query): Query<ListFacilitiesQuery>,
) -> AppResult<ApiResponse<FacilityPage>> {
    let page = state
        .facility_service
        .list(&query.filter(), query.limit, query.offset)
        .await?;
    Ok(ApiResponse::ok(page))
}

async fn show(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FacilityResponse>> {
    let facility = state.facility_service.get(&id).await?;
    Ok(ApiResponse::ok(facility.into()))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    RequestLang(lang): RequestLang,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<CreateFacilityInput>,
) -> AppResult<ApiResponse<FacilityResponse>> {
    let facility = state
        .facility_service
        .create(&principal, input, lang, &meta)
        .await?;
    Ok(ApiResponse::ok(facility.into()))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    RequestLang(lang): RequestLang,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<String>,
    Json(input): Json<UpdateFacilityInput>,
) -> AppResult<ApiResponse<FacilityResponse>> {
    let facility = state
        .facility_service
        .update(&principal, &id, input, lang, &meta)
        .await?;
    Ok(ApiResponse::ok(facility.into()))
}

async fn upload_image(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<FacilityResponse>> {
    let upload = read_image_upload(multipart).await?;
    let facility = state
        .facility_service
        .upload_image(
            &principal,
            &id,
            &upload.data,
            &upload.file_name,
            &upload.content_type,
        )
        .await?;
    Ok(ApiResponse::ok(facility.into()))
}

async fn map(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
) -> AppResult<ApiResponse<Vec<MapPoint>>> {
    let points = state.facility_service.map_points().await?;
    Ok(ApiResponse::ok(points))
}

/// Facilities of one sector, for the per-sector pages.
#[derive(Debug, Serialize)]
pub struct SectorFacilities {
    pub sector: Sector,
    pub label: Label,
    pub facilities: Vec<FacilityResponse>,
}

async fn by_sector(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Path(sector): Path<Sector>,
) -> AppResult<ApiResponse<SectorFacilities>> {
    let facilities = state.facility_service.list_by_sector(sector).await?;
    Ok(ApiResponse::ok(SectorFacilities {
        sector,
        label: labels::sector(sector),
        facilities: facilities.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/map", get(map))
        .route("/{id}", get(show).patch(update))
        .route("/{id}/image", post(upload_image))
}

pub fn sector_router() -> Router<AppState> {
    Router::new().route("/{sector}/facilities", get(by_sector))
}
