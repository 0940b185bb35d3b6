//! API integration tests.
//!
//! These tests drive the full application router against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;
use wilaiety_api::{AppState, app};
use wilaiety_common::config::{
    Config, DatabaseConfig, LocaleConfig, LogConfig, ServerConfig, SiteConfig, StorageConfig,
};
use wilaiety_common::{LocalStorage, StorageBackend};
use wilaiety_db::entities::user_role::AppRole;
use wilaiety_db::entities::{activity_log, auth_user, user_role};

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "http://localhost:3000".to_string(),
            body_limit: 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/wilaiety_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        storage: StorageConfig::default(),
        site: SiteConfig::default(),
        locale: LocaleConfig::default(),
        log: LogConfig::default(),
    }
}

fn create_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn create_test_app(db: DatabaseConnection) -> Router {
    create_test_app_on(Arc::new(db))
}

fn create_test_app_on(db: Arc<DatabaseConnection>) -> Router {
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        PathBuf::from("/tmp/wilaiety-api-tests"),
        "/storage".to_string(),
    ));
    let state = AppState::new(db, &test_config(), storage);
    app(state)
}

fn account(id: &str, email: &str) -> auth_user::Model {
    auth_user::Model {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        token: Some(format!("token-{id}")),
        created_at: Utc::now(),
        last_sign_in_at: None,
    }
}

fn role_row(user_id: &str, role: AppRole) -> user_role::Model {
    user_role::Model {
        id: format!("role-{user_id}"),
        user_id: user_id.to_string(),
        role,
        created_at: Utc::now(),
    }
}

fn activity_row(user_id: &str, action: &str) -> activity_log::Model {
    activity_log::Model {
        id: "log1".to_string(),
        user_id: user_id.to_string(),
        user_email: None,
        action: action.to_string(),
        details: None,
        ip_address: "unknown".to_string(),
        user_agent: None,
        created_at: Utc::now(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_meta_follows_language() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/meta")
                .header("x-lang", "ar")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let data = &body["data"];
    assert_eq!(data["name"], "Wilaiety");
    assert_eq!(data["lang"], "ar");
    assert_eq!(data["direction"], "rtl");
    assert_eq!(data["languages"], json!(["fr", "ar"]));
}

#[tokio::test]
async fn test_home_is_served() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["api"], "/api");
    assert_eq!(body["data"]["lang"], "fr");
}

#[tokio::test]
async fn test_registry_requires_auth() {
    let app = create_test_app(create_mock_db());

    for uri in ["/api/facilities", "/api/licenses", "/api/reports/dashboard"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_api_path_is_not_found() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_page_redirects_home() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/old/dashboard/page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_non_admin_cannot_list_users() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account("u1", "agent@example.org")]])
        .append_query_results([vec![role_row("u1", AppRole::User)]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, "Bearer token-u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_log_activity_requires_fields() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(post_json(
            "/functions/v1/log-activity",
            &json!({ "action": "login" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "user_id and action are required");
}

#[tokio::test]
async fn test_log_activity_success() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![activity_row("u1", "export_csv")]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(post_json(
            "/functions/v1/log-activity",
            &json!({ "user_id": "u1", "action": "export_csv", "details": { "rows": 12 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));
}

/// Post a log-activity call with the given headers and return the stored IP.
async fn logged_ip(headers: &[(&'static str, &str)]) -> sea_orm::Value {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![activity_row("u1", "login")]])
            .into_connection(),
    );
    let app = create_test_app_on(db.clone());

    let mut request = post_json(
        "/functions/v1/log-activity",
        &json!({ "user_id": "u1", "action": "login" }),
    );
    for (name, value) in headers {
        request
            .headers_mut()
            .insert(*name, header::HeaderValue::from_str(value).unwrap());
    }
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
    let insert = log
        .iter()
        .flat_map(|tx| tx.statements())
        .find(|stmt| stmt.sql.starts_with(r#"INSERT INTO "activity_logs""#))
        .expect("activity row inserted");
    let values = insert.values.as_ref().unwrap().0.clone();
    let candidates = [
        sea_orm::Value::from("41.188.1.2"),
        sea_orm::Value::from("196.200.1.9"),
        sea_orm::Value::from("unknown"),
    ];
    values
        .into_iter()
        .find(|v| candidates.contains(v))
        .expect("ip address bound")
}

#[tokio::test]
async fn test_log_activity_records_forwarded_ip() {
    let ip = logged_ip(&[
        ("x-forwarded-for", "41.188.1.2, 10.0.0.1"),
        ("cf-connecting-ip", "196.200.1.9"),
    ])
    .await;
    assert_eq!(ip, sea_orm::Value::from("41.188.1.2"));
}

#[tokio::test]
async fn test_log_activity_falls_back_to_cloudflare_ip() {
    let ip = logged_ip(&[("cf-connecting-ip", "196.200.1.9")]).await;
    assert_eq!(ip, sea_orm::Value::from("196.200.1.9"));
}

#[tokio::test]
async fn test_log_activity_without_origin_headers() {
    let ip = logged_ip(&[]).await;
    assert_eq!(ip, sea_orm::Value::from("unknown"));
}

#[tokio::test]
async fn test_reset_password_checks_length_first() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(post_json(
            "/functions/v1/reset-user-password",
            &json!({ "target_user_id": "u2", "new_password": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_reset_password_without_token() {
    let app = create_test_app(create_mock_db());

    let response = app
        .oneshot(post_json(
            "/functions/v1/reset-user-password",
            &json!({ "target_user_id": "u2", "new_password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_reset_password_by_non_admin() {
    // Once for the auth middleware, once inside the function.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account("u1", "agent@example.org")]])
        .append_query_results([vec![role_row("u1", AppRole::User)]])
        .append_query_results([vec![account("u1", "agent@example.org")]])
        .append_query_results([vec![role_row("u1", AppRole::User)]])
        .into_connection();
    let app = create_test_app(db);

    let mut request = post_json(
        "/functions/v1/reset-user-password",
        &json!({ "target_user_id": "u2", "new_password": "secret123" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer token-u1".parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Only admins can reset passwords"
    );
}

#[tokio::test]
async fn test_reset_password_by_admin() {
    let admin = account("a1", "admin@example.org");
    let target = account("u2", "agent@example.org");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // auth middleware
        .append_query_results([vec![admin.clone()]])
        .append_query_results([vec![role_row("a1", AppRole::Admin)]])
        // caller
        .append_query_results([vec![admin.clone()]])
        .append_query_results([vec![role_row("a1", AppRole::Admin)]])
        // target lookup, reload and update
        .append_query_results([vec![target.clone()]])
        .append_query_results([vec![target.clone()]])
        .append_query_results([vec![target.clone()]])
        .append_query_results([vec![activity_row("a1", "password_reset_by_admin")]])
        .into_connection();
    let app = create_test_app(db);

    let mut request = post_json(
        "/functions/v1/reset-user-password",
        &json!({ "target_user_id": "u2", "new_password": "secret123" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer token-a1".parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));
}
