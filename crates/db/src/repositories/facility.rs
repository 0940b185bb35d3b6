//! Facility repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Func, LikeExpr},
};
use wilaiety_common::{AppError, AppResult};

use crate::entities::facility::{FacilityStatus, Jurisdiction, Sector};
use crate::entities::{Facility, facility};

/// Filter for listing facilities.
#[derive(Debug, Clone, Default)]
pub struct FacilityFilter {
    /// Case-insensitive match on either name or the address.
    pub search: Option<String>,
    pub sector: Option<Sector>,
    pub status: Option<FacilityStatus>,
    pub jurisdiction: Option<Jurisdiction>,
    pub division_id: Option<String>,
}

impl FacilityFilter {
    fn apply(&self, mut query: Select<Facility>) -> Select<Facility> {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(&search.to_lowercase());
            let contains = |col: facility::Column| {
                Expr::expr(Func::lower(Expr::col(col)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            query = query.filter(
                Condition::any()
                    .add(contains(facility::Column::NameFr))
                    .add(contains(facility::Column::NameAr))
                    .add(contains(facility::Column::Address)),
            );
        }
        if let Some(sector) = self.sector {
            query = query.filter(facility::Column::Sector.eq(sector));
        }
        if let Some(status) = self.status {
            query = query.filter(facility::Column::Status.eq(status));
        }
        if let Some(jurisdiction) = self.jurisdiction {
            query = query.filter(facility::Column::Jurisdiction.eq(jurisdiction));
        }
        if let Some(division_id) = &self.division_id {
            query = query.filter(facility::Column::DivisionId.eq(division_id.as_str()));
        }
        query
    }
}

/// Wrap a search term in `%...%`, escaping LIKE wildcards it contains.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Facility repository for database operations.
#[derive(Clone)]
pub struct FacilityRepository {
    db: Arc<DatabaseConnection>,
}

impl FacilityRepository {
    /// Create a new facility repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a facility by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<facility::Model>> {
        Facility::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Get a facility by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<facility::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::FacilityNotFound(id.to_string()))
    }

    /// List facilities matching a filter, newest first.
    pub async fn find(
        &self,
        filter: &FacilityFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<facility::Model>> {
        filter
            .apply(Facility::find())
            .order_by(facility::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Every facility matching a filter, ordered by French name (exports).
    pub async fn find_all(&self, filter: &FacilityFilter) -> AppResult<Vec<facility::Model>> {
        filter
            .apply(Facility::find())
            .order_by(facility::Column::NameFr, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Count facilities matching a filter.
    pub async fn count(&self, filter: &FacilityFilter) -> AppResult<u64> {
        filter
            .apply(Facility::find())
            .count(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Facilities that have a coordinate string set.
    pub async fn find_with_coordinates(&self) -> AppResult<Vec<facility::Model>> {
        Facility::find()
            .filter(facility::Column::GpsCoordinates.is_not_null())
            .filter(facility::Column::GpsCoordinates.ne(""))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Facility count per sector.
    pub async fn count_by_sector(&self) -> AppResult<Vec<(Sector, i64)>> {
        Facility::find()
            .select_only()
            .column(facility::Column::Sector)
            .column_as(Expr::col(facility::Column::Id).count(), "count")
            .group_by(facility::Column::Sector)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Facility count per status.
    pub async fn count_by_status(&self) -> AppResult<Vec<(FacilityStatus, i64)>> {
        Facility::find()
            .select_only()
            .column(facility::Column::Status)
            .column_as(Expr::col(facility::Column::Id).count(), "count")
            .group_by(facility::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::db)
    }

    /// Create a new facility.
    pub async fn create(&self, model: facility::ActiveModel) -> AppResult<facility::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::db)
    }

    /// Update a facility.
    pub async fn update(&self, model: facility::ActiveModel) -> AppResult<facility::Model> {
        model.update(self.db.as_ref()).await.map_err(AppError::db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    use crate::entities::facility::{LegalDomain, Ownership};

    fn create_test_facility(id: &str, sector: Sector) -> facility::Model {
        facility::Model {
            id: id.to_string(),
            name_fr: "Hôpital régional".to_string(),
            name_ar: "المستشفى الجهوي".to_string(),
            sector,
            jurisdiction: Jurisdiction::Regional,
            ownership: Ownership::State,
            legal_domain: LegalDomain::PublicDomain,
            division_id: None,
            region: Some("Rosso".to_string()),
            address: None,
            description: None,
            gps_coordinates: Some("16.51,-15.80".to_string()),
            status: FacilityStatus::Active,
            image_url: None,
            website_url: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<facility::Model>::new()])
                .into_connection(),
        );

        let repo = FacilityRepository::new(db);
        let result = repo.get_by_id("nope").await;

        assert!(matches!(result, Err(AppError::FacilityNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_with_filter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_facility("f1", Sector::Health)]])
                .into_connection(),
        );

        let repo = FacilityRepository::new(db);
        let filter = FacilityFilter {
            search: Some("Hôpital".to_string()),
            sector: Some(Sector::Health),
            ..FacilityFilter::default()
        };
        let found = repo.find(&filter, 20, 0).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sector, Sector::Health);
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = FacilityRepository::new(db);
        let filter = FacilityFilter {
            status: Some(FacilityStatus::Suspended),
            ..FacilityFilter::default()
        };

        assert_eq!(repo.count(&filter).await.unwrap(), 3);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rosso"), "%rosso%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn test_search_binds_escaped_pattern() {
        let filter = FacilityFilter {
            search: Some(" 100% ".to_string()),
            ..Default::default()
        };
        let stmt = filter.apply(Facility::find()).build(DatabaseBackend::Postgres);

        assert!(stmt.sql.contains("ESCAPE"));
        let values = stmt.values.map(|v| v.0).unwrap_or_default();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| *v == sea_orm::Value::from("%100\\%%")));
    }
}
