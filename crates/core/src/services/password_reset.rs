//! Admin-initiated password reset.
//!
//! Checks run in a fixed order and the first failing one decides the error:
//! password length, caller token, caller role, target account.

use serde::Deserialize;
use serde_json::json;
use wilaiety_common::AppError;
use wilaiety_db::repositories::AuthUserRepository;

use crate::policy::{Permission, Policy};
use crate::services::activity::{ActivityEntry, ActivityService, RequestMeta};
use crate::services::auth::{AuthService, MIN_PASSWORD_LENGTH};

/// Body of the `reset-user-password` function.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordInput {
    #[serde(default)]
    pub target_user_id: String,
    #[serde(default)]
    pub new_password: String,
}

/// Reasons a reset is refused.
#[derive(Debug, thiserror::Error)]
pub enum PasswordResetError {
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Only admins can reset passwords")]
    NotAdmin,

    #[error("User not found")]
    UserNotFound,

    #[error("Unknown error")]
    Unknown(#[source] AppError),
}

/// Password reset service.
#[derive(Clone)]
pub struct PasswordResetService {
    auth: AuthService,
    user_repo: AuthUserRepository,
    activity: ActivityService,
}

impl PasswordResetService {
    /// Create a new password reset service.
    #[must_use]
    pub const fn new(
        auth: AuthService,
        user_repo: AuthUserRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            auth,
            user_repo,
            activity,
        }
    }

    /// Set `target_user_id`'s password on behalf of the caller holding
    /// `bearer`.
    pub async fn reset(
        &self,
        bearer: Option<&str>,
        input: ResetPasswordInput,
        meta: &RequestMeta,
    ) -> Result<(), PasswordResetError> {
        if input.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordResetError::PasswordTooShort);
        }

        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PasswordResetError::Unauthorized)?;
        let caller = match self.auth.principal_for_token(token).await {
            Ok(principal) => principal,
            Err(AppError::Unauthorized) => return Err(PasswordResetError::Unauthorized),
            Err(e) => return Err(PasswordResetError::Unknown(e)),
        };

        Policy::authorize(&caller, Permission::ResetPassword)
            .map_err(|_| PasswordResetError::NotAdmin)?;

        let target_id = input.target_user_id.trim();
        if target_id.is_empty() {
            return Err(PasswordResetError::UserNotFound);
        }
        self.user_repo
            .find_by_id(target_id)
            .await
            .map_err(PasswordResetError::Unknown)?
            .ok_or(PasswordResetError::UserNotFound)?;

        self.auth
            .set_password(target_id, &input.new_password)
            .await
            .map_err(PasswordResetError::Unknown)?;

        self.activity
            .log(
                ActivityEntry::by(&caller, "password_reset_by_admin")
                    .with_details(json!({ "target_user_id": target_id })),
                meta,
            )
            .await
            .map_err(PasswordResetError::Unknown)?;

        tracing::info!(
            admin_id = %caller.user_id,
            target_user_id = %target_id,
            "Password reset by admin"
        );
        Ok(())
    }
}
