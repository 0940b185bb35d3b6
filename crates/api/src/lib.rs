//! HTTP API layer for the Wilaiety registry.
//!
//! - **Endpoints**: JSON API under `/api`, serverless-style functions under
//!   `/functions/v1`
//! - **Extractors**: authenticated principal, request language, client origin
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state, response::Redirect, routing::get};

pub use endpoints::router;
pub use middleware::AppState;

/// Application router: landing page, API, functions, and a redirect home
/// for anything else.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(endpoints::meta::home))
        .nest("/api", endpoints::router())
        .nest("/functions/v1", endpoints::functions::router())
        .fallback(redirect_home)
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .with_state(state)
}

/// Unknown dashboard paths land on the home page.
async fn redirect_home() -> Redirect {
    Redirect::to("/")
}
