//! Account repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use wilaiety_common::{AppError, AppResult};

use crate::entities::{AuthUser, auth_user};

/// Account repository for database operations.
#[derive(Clone)]
pub struct AuthUserRepository {
    db: Arc<DatabaseConnection>,
}

impl AuthUserRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<auth_user::Model>> {
        AuthUser::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Get an account by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<auth_user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find an account by (lowercase) email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<auth_user::Model>> {
        AuthUser::find()
            .filter(auth_user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Find an account by its current bearer token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<auth_user::Model>> {
        AuthUser::find()
            .filter(auth_user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Find several accounts at once.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<auth_user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        AuthUser::find()
            .filter(auth_user::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Count accounts.
    pub async fn count(&self) -> AppResult<u64> {
        AuthUser::find()
            .count(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Create a new account.
    pub async fn create(&self, model: auth_user::ActiveModel) -> AppResult<auth_user::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Update an account.
    pub async fn update(&self, model: auth_user::ActiveModel) -> AppResult<auth_user::Model> {
        model.update(self.db.as_ref()).await.map_err(AppError::db)
    }
}
