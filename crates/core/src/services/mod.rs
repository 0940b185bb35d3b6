//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod auth;
pub mod divisions;
pub mod facilities;
pub mod licenses;
pub mod password_reset;
pub mod reports;
pub mod users;

pub use activity::{
    ActivityEntry, ActivityService, DEFAULT_ACTIVITY_LIMIT, LogActivityInput, RequestMeta,
    client_ip,
};
pub use auth::{AuthService, AuthSession, SignInInput, SignUpInput};
pub use divisions::{CreateDivisionInput, DivisionService, UpdateDivisionInput};
pub use facilities::{
    BadgeTone, CreateFacilityInput, FacilityPage, FacilityService, MapPoint, StatusBadge,
    UpdateFacilityInput, status_badge,
};
pub use licenses::{CreateLicenseInput, ExpiryNotice, LicenseService, LicenseView, expiry_notice};
pub use password_reset::{PasswordResetError, PasswordResetService, ResetPasswordInput};
pub use reports::{DashboardStats, ReportService};
pub use users::{UpdateProfileInput, UserProfile, UserService, UserSummary};

use wilaiety_common::{AppError, AppResult, parse_gps};

/// Trim and drop empty strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim a mandatory name, rejecting blank input.
pub(crate) fn required_name(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(value.to_string())
}

/// Reject a non-empty coordinate string that does not parse.
pub(crate) fn check_gps(gps: Option<&str>) -> AppResult<()> {
    match gps {
        Some(value) if parse_gps(Some(value)).is_none() => Err(AppError::Validation(format!(
            "Invalid GPS coordinates \"{value}\", expected \"lat,lng\""
        ))),
        _ => Ok(()),
    }
}

/// Uploads to the image buckets must be non-empty images.
pub(crate) fn ensure_image(content_type: &str, data: &[u8]) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::Validation("Empty file".to_string()));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Expected an image, got {content_type}"
        )));
    }
    Ok(())
}
