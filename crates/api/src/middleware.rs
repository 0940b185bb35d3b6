//! Application state and middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use sea_orm::DatabaseConnection;
use wilaiety_common::config::{Config, SiteConfig};
use wilaiety_common::{Lang, StorageBackend};
use wilaiety_core::{
    ActivityService, AuthService, DivisionService, FacilityService, LicenseService,
    PasswordResetService, ReportService, UserService,
};
use wilaiety_db::repositories::{
    ActivityLogRepository, AuthUserRepository, DivisionRepository, FacilityRepository,
    LicenseRepository, ProfileRepository, UserRoleRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub facility_service: FacilityService,
    pub license_service: LicenseService,
    pub division_service: DivisionService,
    pub activity_service: ActivityService,
    pub password_reset_service: PasswordResetService,
    pub report_service: ReportService,
    pub site: Arc<SiteConfig>,
    pub default_lang: Lang,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: &Config,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        let user_repo = AuthUserRepository::new(Arc::clone(&db));
        let profile_repo = ProfileRepository::new(Arc::clone(&db));
        let role_repo = UserRoleRepository::new(Arc::clone(&db));
        let division_repo = DivisionRepository::new(Arc::clone(&db));
        let facility_repo = FacilityRepository::new(Arc::clone(&db));
        let license_repo = LicenseRepository::new(Arc::clone(&db));
        let activity_repo = ActivityLogRepository::new(Arc::clone(&db));

        let activity_service = ActivityService::new(activity_repo);
        let auth_service = AuthService::new(
            user_repo.clone(),
            profile_repo.clone(),
            role_repo.clone(),
            activity_service.clone(),
        );
        let user_service = UserService::new(
            user_repo.clone(),
            profile_repo,
            role_repo,
            activity_service.clone(),
            Arc::clone(&storage),
        );
        let facility_service = FacilityService::new(
            facility_repo.clone(),
            division_repo.clone(),
            activity_service.clone(),
            storage,
        );
        let license_service = LicenseService::new(
            license_repo.clone(),
            facility_repo.clone(),
            activity_service.clone(),
            config.locale.clone(),
        );
        let division_service = DivisionService::new(division_repo.clone());
        let password_reset_service = PasswordResetService::new(
            auth_service.clone(),
            user_repo.clone(),
            activity_service.clone(),
        );
        let report_service = ReportService::new(
            facility_repo,
            license_repo,
            division_repo,
            user_repo,
            config.locale.clone(),
        );

        Self {
            auth_service,
            user_service,
            facility_service,
            license_service,
            division_service,
            activity_service,
            password_reset_service,
            report_service,
            site: Arc::new(config.site.clone()),
            default_lang: config.locale.default_language,
        }
    }
}

/// Authentication middleware.
///
/// A valid bearer token puts the caller's [`wilaiety_core::Principal`]
/// into the request extensions; anything else leaves the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = req.headers().typed_get::<Authorization<Bearer>>() {
        match state.auth_service.principal_for_token(bearer.token()).await {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
            }
            Err(e) if e.is_server_error() => {
                tracing::warn!(error = %e, "Token lookup failed");
            }
            Err(_) => {}
        }
    }

    next.run(req).await
}
