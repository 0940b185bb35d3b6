//! Site metadata.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use wilaiety_common::{Direction, Lang, t};

use crate::{extractors::RequestLang, middleware::AppState, response::ApiResponse};

/// Branding and language settings for the dashboard shell.
#[derive(Serialize)]
pub struct MetaResponse {
    pub version: &'static str,
    pub name: String,
    pub name_ar: String,
    pub tagline: String,
    pub tagline_ar: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub client_key: String,
    pub languages: [Lang; 2],
    pub default_language: Lang,
    pub lang: Lang,
    pub direction: Direction,
}

/// Landing document served at `/`.
#[derive(Serialize)]
pub struct HomeResponse {
    pub name: String,
    pub version: &'static str,
    pub api: &'static str,
    pub lang: Lang,
    pub direction: Direction,
}

async fn meta(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
) -> ApiResponse<MetaResponse> {
    let site = &state.site;
    ApiResponse::ok(MetaResponse {
        version: env!("CARGO_PKG_VERSION"),
        name: site.name.clone(),
        name_ar: site.name_ar.clone(),
        tagline: site.tagline.clone(),
        tagline_ar: site.tagline_ar.clone(),
        primary_color: site.primary_color.clone(),
        secondary_color: site.secondary_color.clone(),
        client_key: site.client_key.clone(),
        languages: [Lang::Fr, Lang::Ar],
        default_language: state.default_lang,
        lang,
        direction: lang.direction(),
    })
}

pub(crate) async fn home(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
) -> ApiResponse<HomeResponse> {
    ApiResponse::ok(HomeResponse {
        name: t(lang, &state.site.name, &state.site.name_ar).to_string(),
        version: env!("CARGO_PKG_VERSION"),
        api: "/api",
        lang,
        direction: lang.direction(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
