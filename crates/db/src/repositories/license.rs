//! License repository.

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, sea_query::Expr,
};
use wilaiety_common::{AppError, AppResult};

use crate::entities::license::LicenseStatus;
use crate::entities::{License, license};

/// Filter for listing licenses.
#[derive(Debug, Clone, Default)]
pub struct LicenseFilter {
    pub facility_id: Option<String>,
    pub status: Option<LicenseStatus>,
}

impl LicenseFilter {
    fn apply(&self, mut query: Select<License>) -> Select<License> {
        if let Some(facility_id) = &self.facility_id {
            query = query.filter(license::Column::FacilityId.eq(facility_id.as_str()));
        }
        if let Some(status) = self.status {
            query = query.filter(license::Column::Status.eq(status));
        }
        query
    }
}

/// License repository for database operations.
#[derive(Clone)]
pub struct LicenseRepository {
    db: Arc<DatabaseConnection>,
}

impl LicenseRepository {
    /// Create a new license repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a license by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<license::Model>> {
        License::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// List licenses matching a filter, soonest expiry first.
    pub async fn find(&self, filter: &LicenseFilter) -> AppResult<Vec<license::Model>> {
        filter
            .apply(License::find())
            .order_by(license::Column::ExpiryDate, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Licenses expiring within `[from, to]`, excluding cancelled ones.
    pub async fn find_expiring_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<license::Model>> {
        License::find()
            .filter(license::Column::ExpiryDate.between(from, to))
            .filter(license::Column::Status.ne(LicenseStatus::Cancelled))
            .order_by(license::Column::ExpiryDate, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Count all licenses.
    pub async fn count(&self) -> AppResult<u64> {
        License::find()
            .count(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// License count per stored status.
    pub async fn count_by_status(&self) -> AppResult<Vec<(LicenseStatus, i64)>> {
        License::find()
            .select_only()
            .column(license::Column::Status)
            .column_as(Expr::col(license::Column::Id).count(), "count")
            .group_by(license::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Create a new license.
    pub async fn create(&self, model: license::ActiveModel) -> AppResult<license::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Delete a license. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = License::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::db)?;
        Ok(result.rows_affected > 0)
    }
}
