//! User role repository.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use wilaiety_common::{AppError, AppResult};

use crate::entities::{UserRole, user_role};
use crate::entities::user_role::AppRole;

/// Repository for the `user_roles` table.
#[derive(Clone)]
pub struct UserRoleRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the role row of a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_role::Model>> {
        UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Role of a user; `None` when no row exists.
    pub async fn role_of(&self, user_id: &str) -> AppResult<Option<AppRole>> {
        Ok(self.find_by_user_id(user_id).await?.map(|r| r.role))
    }

    /// All role rows.
    pub async fn find_all(&self) -> AppResult<Vec<user_role::Model>> {
        UserRole::find()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Set the role of a user, creating the row if needed.
    pub async fn upsert(&self, id: String, user_id: &str, role: AppRole) -> AppResult<user_role::Model> {
        if let Some(existing) = self.find_by_user_id(user_id).await? {
            let mut active: user_role::ActiveModel = existing.into();
            active.role = Set(role);
            return active.update(self.db.as_ref()).await.map_err(AppError::db);
        }

        user_role::ActiveModel {
            id: Set(id),
            user_id: Set(user_id.to_string()),
            role: Set(role),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(AppError::db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn role_row(user_id: &str, role: AppRole) -> user_role::Model {
        user_role::Model {
            id: format!("role-{user_id}"),
            user_id: user_id.to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_role_of_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[role_row("u1", AppRole::Admin)]])
                .into_connection(),
        );

        let repo = UserRoleRepository::new(db);
        assert_eq!(repo.role_of("u1").await.unwrap(), Some(AppRole::Admin));
    }

    #[tokio::test]
    async fn test_role_of_missing_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_role::Model>::new()])
                .into_connection(),
        );

        let repo = UserRoleRepository::new(db);
        assert_eq!(repo.role_of("u2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[role_row("u1", AppRole::User)]])
                .append_query_results([[role_row("u1", AppRole::Admin)]])
                .into_connection(),
        );

        let repo = UserRoleRepository::new(db);
        let updated = repo
            .upsert("ignored".to_string(), "u1", AppRole::Admin)
            .await
            .unwrap();

        assert_eq!(updated.role, AppRole::Admin);
        assert_eq!(updated.id, "role-u1");
    }
}
