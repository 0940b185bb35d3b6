//! Profiles and roles.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use wilaiety_common::{AppError, AppResult, Bucket, IdGenerator, StorageBackend, storage_key};
use wilaiety_db::entities::profile;
use wilaiety_db::repositories::{AuthUserRepository, ProfileRepository, UserRoleRepository};

use crate::policy::{Permission, Policy, Principal, Role};
use crate::services::activity::{ActivityEntry, ActivityService, RequestMeta};
use crate::services::{ensure_image, non_blank};

/// Own profile as returned to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub profile: profile::Model,
    pub email: String,
    pub role: Role,
}

/// Row of the admin users page.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// Input for editing one's own profile.
///
/// Absent fields are left alone; blank strings clear the field.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 256))]
    pub full_name: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[validate(length(max = 256))]
    pub job_title: Option<String>,
    #[validate(length(max = 256))]
    pub department: Option<String>,
}

/// Profile and role service.
#[derive(Clone)]
pub struct UserService {
    user_repo: AuthUserRepository,
    profile_repo: ProfileRepository,
    role_repo: UserRoleRepository,
    activity: ActivityService,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: AuthUserRepository,
        profile_repo: ProfileRepository,
        role_repo: UserRoleRepository,
        activity: ActivityService,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            role_repo,
            activity,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Profile of `user_id` with its email and role.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let profile = self.profile_repo.get_by_id(user_id).await?;
        let role = self.role_repo.role_of(user_id).await?.unwrap_or(Role::User);

        Ok(UserProfile {
            profile,
            email: user.email,
            role,
        })
    }

    /// Edit the caller's own profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_id(user_id).await?;
        let mut active: profile::ActiveModel = profile.into();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(non_blank(Some(full_name)));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(non_blank(Some(phone)));
        }
        if let Some(job_title) = input.job_title {
            active.job_title = Set(non_blank(Some(job_title)));
        }
        if let Some(department) = input.department {
            active.department = Set(non_blank(Some(department)));
        }
        active.updated_at = Set(Some(Utc::now()));

        self.profile_repo.update(active).await
    }

    /// Store a new avatar and point the profile at it.
    pub async fn upload_avatar(
        &self,
        user_id: &str,
        data: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> AppResult<profile::Model> {
        ensure_image(content_type, data)?;
        let profile = self.profile_repo.get_by_id(user_id).await?;

        let key = storage_key(user_id, file_name);
        let uploaded = self
            .storage
            .upload(Bucket::Avatars, &key, data, content_type)
            .await?;

        let mut active: profile::ActiveModel = profile.into();
        active.avatar_url = Set(Some(uploaded.url));
        active.updated_at = Set(Some(Utc::now()));
        self.profile_repo.update(active).await
    }

    /// Every account with its profile and role.
    pub async fn list_users(&self, principal: &Principal) -> AppResult<Vec<UserSummary>> {
        Policy::authorize(principal, Permission::ManageUsers)?;

        let profiles = self.profile_repo.find_all().await?;
        let ids: Vec<String> = profiles.iter().map(|p| p.id.clone()).collect();
        let accounts: HashMap<String, _> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        let roles: HashMap<String, Role> = self
            .role_repo
            .find_all()
            .await?
            .into_iter()
            .map(|r| (r.user_id, r.role))
            .collect();

        Ok(profiles
            .into_iter()
            .map(|p| {
                let account = accounts.get(&p.id);
                UserSummary {
                    role: roles.get(&p.id).copied().unwrap_or(Role::User),
                    email: account.map(|a| a.email.clone()),
                    last_sign_in_at: account.and_then(|a| a.last_sign_in_at),
                    id: p.id,
                    full_name: p.full_name,
                    phone: p.phone,
                    job_title: p.job_title,
                    department: p.department,
                    avatar_url: p.avatar_url,
                    created_at: p.created_at,
                }
            })
            .collect())
    }

    /// Change another account's role.
    ///
    /// An admin cannot demote themself, so the deployment always keeps
    /// at least the caller as admin.
    pub async fn set_role(
        &self,
        principal: &Principal,
        target_user_id: &str,
        role: Role,
        meta: &RequestMeta,
    ) -> AppResult<Role> {
        Policy::authorize(principal, Permission::ManageRoles)?;

        if target_user_id == principal.user_id && role != Role::Admin {
            return Err(AppError::BadRequest(
                "You cannot remove your own admin role".to_string(),
            ));
        }
        self.user_repo.get_by_id(target_user_id).await?;

        let row = self
            .role_repo
            .upsert(self.id_gen.generate(), target_user_id, role)
            .await?;

        self.activity
            .log_quietly(
                ActivityEntry::by(principal, "role_changed")
                    .with_details(json!({ "target_user_id": target_user_id, "role": role })),
                meta,
            )
            .await;

        tracing::info!(
            admin_id = %principal.user_id,
            target_user_id = %target_user_id,
            ?role,
            "Role changed"
        );
        Ok(row.role)
    }

    /// Whether `user_id` holds the admin role.
    pub async fn is_admin(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.role_repo.role_of(user_id).await? == Some(Role::Admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use wilaiety_common::LocalStorage;
    use wilaiety_db::entities::{auth_user, user_role};
    use wilaiety_db::repositories::ActivityLogRepository;

    fn service(db: DatabaseConnection) -> UserService {
        let db = Arc::new(db);
        UserService::new(
            AuthUserRepository::new(db.clone()),
            ProfileRepository::new(db.clone()),
            UserRoleRepository::new(db.clone()),
            ActivityService::new(ActivityLogRepository::new(db)),
            Arc::new(LocalStorage::new(
                std::env::temp_dir().join("wilaiety-users-test"),
                "/storage".to_string(),
            )),
        )
    }

    fn principal(id: &str, role: Role) -> Principal {
        Principal {
            user_id: id.to_string(),
            email: format!("{id}@wilaya.mr"),
            role,
        }
    }

    fn profile_row(id: &str) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            full_name: Some("Mariem Mint Ahmed".to_string()),
            phone: None,
            job_title: Some("Agent".to_string()),
            department: None,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn account(id: &str) -> auth_user::Model {
        auth_user::Model {
            id: id.to_string(),
            email: format!("{id}@wilaya.mr"),
            password_hash: String::new(),
            token: None,
            created_at: Utc::now(),
            last_sign_in_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db).list_users(&principal("u1", Role::User)).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_users_joins_roles() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_row("u1"), profile_row("u2")]])
            .append_query_results([[account("u1"), account("u2")]])
            .append_query_results([[user_role::Model {
                id: "r1".to_string(),
                user_id: "u1".to_string(),
                role: Role::Admin,
                created_at: Utc::now(),
            }]])
            .into_connection();

        let users = service(db)
            .list_users(&principal("u1", Role::Admin))
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::User);
        assert_eq!(users[1].email.as_deref(), Some("u2@wilaya.mr"));
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .set_role(
                &principal("u1", Role::Admin),
                "u1",
                Role::User,
                &RequestMeta::unknown(),
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_profile_blank_clears() {
        let mut cleared = profile_row("u1");
        cleared.job_title = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_row("u1")]])
            .append_query_results([[cleared]])
            .into_connection();

        let updated = service(db)
            .update_profile(
                "u1",
                UpdateProfileInput {
                    job_title: Some("   ".to_string()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.job_title, None);
        assert_eq!(updated.full_name.as_deref(), Some("Mariem Mint Ahmed"));
    }

    #[tokio::test]
    async fn test_avatar_must_be_image() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .upload_avatar("u1", b"%PDF", "cv.pdf", "application/pdf")
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
