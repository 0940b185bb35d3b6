//! Account service: sign-up, sign-in and bearer token resolution.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wilaiety_common::{AppError, AppResult, IdGenerator};
use wilaiety_db::entities::{auth_user, profile};
use wilaiety_db::repositories::{AuthUserRepository, ProfileRepository, UserRoleRepository};

use crate::policy::{Principal, Role};
use crate::services::activity::{ActivityEntry, ActivityService, RequestMeta};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Input for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub full_name: Option<String>,
}

/// Input for signing in.
#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// A signed-in session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Account service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: AuthUserRepository,
    profile_repo: ProfileRepository,
    role_repo: UserRoleRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(
        user_repo: AuthUserRepository,
        profile_repo: ProfileRepository,
        role_repo: UserRoleRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            role_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an account with its profile and role rows.
    ///
    /// The first account of a fresh deployment becomes admin.
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<AuthSession> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let role = if self.user_repo.count().await? == 0 {
            Role::Admin
        } else {
            Role::User
        };

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let now = Utc::now();

        let user = self
            .user_repo
            .create(auth_user::ActiveModel {
                id: Set(user_id.clone()),
                email: Set(email),
                password_hash: Set(hash_password(&input.password)?),
                token: Set(Some(token.clone())),
                created_at: Set(now),
                last_sign_in_at: Set(Some(now)),
            })
            .await?;

        self.profile_repo
            .create(profile::ActiveModel {
                id: Set(user_id.clone()),
                full_name: Set(input.full_name.filter(|n| !n.trim().is_empty())),
                phone: Set(None),
                job_title: Set(None),
                department: Set(None),
                avatar_url: Set(None),
                created_at: Set(now),
                updated_at: Set(None),
            })
            .await?;

        self.role_repo
            .upsert(self.id_gen.generate(), &user_id, role)
            .await?;

        tracing::info!(user_id = %user.id, ?role, "Account created");

        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            role,
            token,
        })
    }

    /// Verify credentials and start a new session.
    pub async fn sign_in(&self, input: SignInInput, meta: &RequestMeta) -> AppResult<AuthSession> {
        let user = self
            .user_repo
            .find_by_email(input.email.trim())
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Invalid password");
            return Err(AppError::Unauthorized);
        }

        let token = self.id_gen.generate_token();
        let mut active: auth_user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.last_sign_in_at = Set(Some(Utc::now()));
        let user = self.user_repo.update(active).await?;

        let role = self.role_of(&user.id).await?;
        let principal = Principal {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role,
        };
        self.activity
            .log_quietly(ActivityEntry::by(&principal, "login"), meta)
            .await;

        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            role,
            token,
        })
    }

    /// End the caller's session.
    pub async fn sign_out(&self, principal: &Principal, meta: &RequestMeta) -> AppResult<()> {
        let user = self.user_repo.get_by_id(&principal.user_id).await?;
        let mut active: auth_user::ActiveModel = user.into();
        active.token = Set(None);
        self.user_repo.update(active).await?;

        self.activity
            .log_quietly(ActivityEntry::by(principal, "logout"), meta)
            .await;
        Ok(())
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<auth_user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Resolve a bearer token to a [`Principal`] carrying its role.
    pub async fn principal_for_token(&self, token: &str) -> AppResult<Principal> {
        let user = self.authenticate_by_token(token).await?;
        let role = self.role_of(&user.id).await?;
        Ok(Principal {
            user_id: user.id,
            email: user.email,
            role,
        })
    }

    /// Replace an account's password and end its sessions.
    pub async fn set_password(&self, user_id: &str, new_password: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: auth_user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.token = Set(Some(self.id_gen.generate_token()));
        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Role of a user; a missing role row counts as [`Role::User`].
    pub async fn role_of(&self, user_id: &str) -> AppResult<Role> {
        Ok(self
            .role_repo
            .role_of(user_id)
            .await?
            .unwrap_or(Role::User))
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored PHC string.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use wilaiety_db::entities::user_role;
    use wilaiety_db::repositories::ActivityLogRepository;

    fn service(db: DatabaseConnection) -> AuthService {
        let db = Arc::new(db);
        AuthService::new(
            AuthUserRepository::new(db.clone()),
            ProfileRepository::new(db.clone()),
            UserRoleRepository::new(db.clone()),
            ActivityService::new(ActivityLogRepository::new(db)),
        )
    }

    fn account(id: &str, email: &str, password: &str) -> auth_user::Model {
        auth_user::Model {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            token: Some(format!("token-{id}")),
            created_at: Utc::now(),
            last_sign_in_at: None,
        }
    }

    fn role_row(user_id: &str, role: Role) -> user_role::Model {
        user_role::Model {
            id: format!("r-{user_id}"),
            user_id: user_id.to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("secret1", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn test_sign_up_short_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .sign_up(SignUpInput {
                email: "agent@wilaya.mr".to_string(),
                password: "12345".to_string(),
                full_name: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[account("u1", "agent@wilaya.mr", "secret1")]])
            .into_connection();
        let result = service(db)
            .sign_up(SignUpInput {
                email: "Agent@Wilaya.mr".to_string(),
                password: "secret1".to_string(),
                full_name: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_principal_for_token_defaults_to_user_role() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[account("u1", "agent@wilaya.mr", "secret1")]])
            .append_query_results([Vec::<user_role::Model>::new()])
            .into_connection();

        let principal = service(db).principal_for_token("token-u1").await.unwrap();
        assert_eq!(principal.user_id, "u1");
        assert_eq!(principal.role, Role::User);
    }

    #[tokio::test]
    async fn test_principal_for_token_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[account("u1", "wali@wilaya.mr", "secret1")]])
            .append_query_results([[role_row("u1", Role::Admin)]])
            .into_connection();

        let principal = service(db).principal_for_token("token-u1").await.unwrap();
        assert!(principal.is_admin());
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<auth_user::Model>::new()])
            .into_connection();

        let result = service(db).principal_for_token("nope").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[account("u1", "agent@wilaya.mr", "secret1")]])
            .into_connection();

        let result = service(db)
            .sign_in(
                SignInInput {
                    email: "agent@wilaya.mr".to_string(),
                    password: "wrong".to_string(),
                },
                &RequestMeta::unknown(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
