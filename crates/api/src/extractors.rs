//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use wilaiety_common::{AppError, Lang};
use wilaiety_core::{Principal, RequestMeta, client_ip};

use crate::middleware::AppState;

/// Header carrying the dashboard's language toggle.
pub const LANG_HEADER: &str = "x-lang";

/// Authenticated caller extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Language of the request.
///
/// `X-Lang` wins, then `Accept-Language`, then the deployment default.
#[derive(Debug, Clone, Copy)]
pub struct RequestLang(pub Lang);

impl RequestLang {
    fn from_headers(headers: &HeaderMap, default: Lang) -> Lang {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        header(LANG_HEADER)
            .and_then(|v| v.parse::<Lang>().ok())
            .or_else(|| header("accept-language").and_then(Lang::from_accept_language))
            .unwrap_or(default)
    }
}

impl FromRequestParts<AppState> for RequestLang {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::from_headers(&parts.headers, state.default_lang)))
    }
}

/// Client address and user agent, for the activity log.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub RequestMeta);

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());

        Ok(Self(RequestMeta {
            ip_address: client_ip(header("x-forwarded-for"), header("cf-connecting-ip")),
            user_agent: header("user-agent").map(str::to_string),
        }))
    }
}
