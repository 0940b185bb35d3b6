//! Administrative division repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use wilaiety_common::{AppError, AppResult};

use crate::entities::administrative_division::DivisionType;
use crate::entities::{AdministrativeDivision, administrative_division};

/// Filter for listing divisions.
#[derive(Debug, Clone, Default)]
pub struct DivisionFilter {
    pub division_type: Option<DivisionType>,
    /// `Some(None)` selects top-level divisions.
    pub parent_id: Option<Option<String>>,
    pub active_only: bool,
}

/// Repository for administrative divisions.
#[derive(Clone)]
pub struct DivisionRepository {
    db: Arc<DatabaseConnection>,
}

impl DivisionRepository {
    /// Create a new division repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a division by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<administrative_division::Model>> {
        AdministrativeDivision::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// List divisions matching a filter, ordered by French name.
    pub async fn find(&self, filter: &DivisionFilter) -> AppResult<Vec<administrative_division::Model>> {
        let mut query = AdministrativeDivision::find();

        if let Some(division_type) = filter.division_type {
            query = query.filter(administrative_division::Column::DivisionType.eq(division_type));
        }
        match &filter.parent_id {
            Some(Some(parent)) => {
                query = query.filter(administrative_division::Column::ParentId.eq(parent.as_str()));
            }
            Some(None) => {
                query = query.filter(administrative_division::Column::ParentId.is_null());
            }
            None => {}
        }
        if filter.active_only {
            query = query.filter(administrative_division::Column::IsActive.eq(true));
        }

        query
            .order_by(administrative_division::Column::NameFr, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Direct children of a division.
    pub async fn find_children(&self, parent_id: &str) -> AppResult<Vec<administrative_division::Model>> {
        self.find(&DivisionFilter {
            parent_id: Some(Some(parent_id.to_string())),
            ..DivisionFilter::default()
        })
        .await
    }

    /// Count all divisions.
    pub async fn count(&self) -> AppResult<u64> {
        AdministrativeDivision::find()
            .count(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Create a new division.
    pub async fn create(
        &self,
        model: administrative_division::ActiveModel,
    ) -> AppResult<administrative_division::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Update a division.
    pub async fn update(
        &self,
        model: administrative_division::ActiveModel,
    ) -> AppResult<administrative_division::Model> {
        model.update(self.db.as_ref()).await.map_err(AppError::db)
    }
}
