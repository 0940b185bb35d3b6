//! Sign-up, sign-in and sign-out.

use axum::{Json, Router, extract::State, routing::post};
use wilaiety_common::AppResult;
use wilaiety_core::{AuthSession, SignInInput, SignUpInput};

use crate::{
    extractors::{AuthUser, ClientMeta},
    middleware::AppState,
    response::ApiResponse,
};

async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignUpInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.auth_service.sign_up(input).await?;
    Ok(ApiResponse::ok(session))
}

async fn signin(
    State(state): State<AppState>,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<SignInInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.auth_service.sign_in(input, &meta).await?;
    Ok(ApiResponse::ok(session))
}

async fn signout(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.sign_out(&principal, &meta).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
