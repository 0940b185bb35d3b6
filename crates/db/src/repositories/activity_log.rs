//! Activity log repository.
//!
//! The table is append-only: there is no update or delete here.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};
use wilaiety_common::{AppError, AppResult};

use crate::entities::{ActivityLog, activity_log};

/// Repository for activity log rows.
#[derive(Clone)]
pub struct ActivityLogRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append one row.
    pub async fn insert(&self, model: activity_log::ActiveModel) -> AppResult<activity_log::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Most recent rows across all users.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<activity_log::Model>> {
        ActivityLog::find()
            .order_by(activity_log::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Most recent rows of one user.
    pub async fn find_recent_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<activity_log::Model>> {
        ActivityLog::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by(activity_log::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Set};

    fn log_row(id: &str, user_id: &str, action: &str) -> activity_log::Model {
        activity_log::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_email: None,
            action: action.to_string(),
            details: None,
            ip_address: "unknown".to_string(),
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_returns_row() {
        let row = log_row("a1", "u1", "login");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row.clone()]])
                .into_connection(),
        );

        let repo = ActivityLogRepository::new(db);
        let inserted = repo
            .insert(activity_log::ActiveModel {
                id: Set(row.id.clone()),
                user_id: Set(row.user_id.clone()),
                user_email: Set(None),
                action: Set(row.action.clone()),
                details: Set(None),
                ip_address: Set(row.ip_address.clone()),
                user_agent: Set(None),
                created_at: Set(row.created_at),
            })
            .await
            .unwrap();

        assert_eq!(inserted, row);
    }

    #[tokio::test]
    async fn test_find_recent_for_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[log_row("a2", "u1", "logout"), log_row("a1", "u1", "login")]])
                .into_connection(),
        );

        let repo = ActivityLogRepository::new(db);
        let rows = repo.find_recent_for_user("u1", 50).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].action, "logout");
    }
}
