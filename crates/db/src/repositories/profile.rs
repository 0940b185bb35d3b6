//! Profile repository.

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, QueryOrder};
use wilaiety_common::{AppError, AppResult};

use crate::entities::{Profile, profile};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by user ID.
    pub async fn find_by_id(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Get a profile by user ID, returning an error if not found.
    pub async fn get_by_id(&self, user_id: &str) -> AppResult<profile::Model> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// List every profile, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<profile::Model>> {
        Profile::find()
            .order_by(profile::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Create a new profile.
    pub async fn create(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Update a profile.
    pub async fn update(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model.update(self.db.as_ref()).await.map_err(AppError::db)
    }
}
