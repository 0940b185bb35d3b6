//! Dashboard statistics and CSV exports.

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use wilaiety_common::AppResult;
use wilaiety_core::DashboardStats;

use crate::{
    extractors::{AuthUser, RequestLang},
    middleware::AppState,
    response::ApiResponse,
};

fn csv_attachment(file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn dashboard(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.report_service.dashboard(&principal).await?;
    Ok(ApiResponse::ok(stats))
}

async fn facilities_csv(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    RequestLang(lang): RequestLang,
) -> AppResult<Response> {
    let csv = state.report_service.facilities_csv(&principal, lang).await?;
    Ok(csv_attachment("facilities.csv", csv))
}

async fn licenses_csv(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    RequestLang(lang): RequestLang,
) -> AppResult<Response> {
    let csv = state.report_service.licenses_csv(&principal, lang).await?;
    Ok(csv_attachment("licenses.csv", csv))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/facilities.csv", get(facilities_csv))
        .route("/licenses.csv", get(licenses_csv))
}
