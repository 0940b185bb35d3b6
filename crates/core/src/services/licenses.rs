//! License service.
//!
//! The stored `status` is maintained outside this service and is never
//! rewritten on read. What the dashboard shows about remaining validity is
//! an [`ExpiryNotice`] derived from `expiry_date` at read time.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use wilaiety_common::config::LocaleConfig;
use wilaiety_common::{AppError, AppResult, Bilingual, IdGenerator};
use wilaiety_db::entities::license::{self, LicenseStatus};
use wilaiety_db::repositories::{FacilityRepository, LicenseFilter, LicenseRepository};

use crate::policy::{Permission, Policy, Principal};
use crate::services::activity::{ActivityEntry, ActivityService, RequestMeta};
use crate::services::non_blank;

/// Licenses expiring within this many days are flagged.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Remaining validity of a license relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpiryNotice {
    Expired { days_ago: i64 },
    ExpiresToday,
    ExpiringSoon { days: i64 },
    Valid { days: i64 },
}

impl ExpiryNotice {
    /// Message shown next to the license.
    #[must_use]
    pub fn message(self) -> Bilingual {
        match self {
            Self::Expired { days_ago } => Bilingual::new(
                format!("Expirée depuis {days_ago} jour(s)"),
                format!("منتهية منذ {days_ago} يوم"),
            ),
            Self::ExpiresToday => Bilingual::new("Expire aujourd'hui", "تنتهي اليوم"),
            Self::ExpiringSoon { days } => Bilingual::new(
                format!("Expire dans {days} jour(s)"),
                format!("تنتهي خلال {days} يوم"),
            ),
            Self::Valid { days } => Bilingual::new(
                format!("{days} jour(s) restant(s)"),
                format!("متبقي {days} يوم"),
            ),
        }
    }
}

/// Classify `expiry` against `today`.
#[must_use]
pub fn expiry_notice(expiry: NaiveDate, today: NaiveDate) -> ExpiryNotice {
    let days = (expiry - today).num_days();
    match days {
        d if d < 0 => ExpiryNotice::Expired { days_ago: -d },
        0 => ExpiryNotice::ExpiresToday,
        d if d <= EXPIRY_WARNING_DAYS => ExpiryNotice::ExpiringSoon { days: d },
        d => ExpiryNotice::Valid { days: d },
    }
}

/// A license with its read-time expiry notice.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseView {
    #[serde(flatten)]
    pub license: license::Model,
    pub expiry_notice: ExpiryNotice,
    pub expiry_message: Bilingual,
}

impl LicenseView {
    pub(crate) fn new(license: license::Model, today: NaiveDate) -> Self {
        let notice = expiry_notice(license.expiry_date, today);
        Self {
            license,
            expiry_notice: notice,
            expiry_message: notice.message(),
        }
    }
}

/// Input for registering a license.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLicenseInput {
    pub facility_id: String,
    #[validate(length(min = 1, max = 128))]
    pub license_number: String,
    #[validate(length(min = 1, max = 128))]
    pub license_type: String,
    #[validate(length(min = 1, max = 256))]
    pub issuing_authority: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: Option<LicenseStatus>,
    #[validate(length(max = 2048))]
    pub document_url: Option<String>,
    #[validate(length(max = 8192))]
    pub notes: Option<String>,
}

/// License service.
#[derive(Clone)]
pub struct LicenseService {
    license_repo: LicenseRepository,
    facility_repo: FacilityRepository,
    activity: ActivityService,
    locale: LocaleConfig,
    id_gen: IdGenerator,
}

impl LicenseService {
    /// Create a new license service.
    #[must_use]
    pub const fn new(
        license_repo: LicenseRepository,
        facility_repo: FacilityRepository,
        activity: ActivityService,
        locale: LocaleConfig,
    ) -> Self {
        Self {
            license_repo,
            facility_repo,
            activity,
            locale,
            id_gen: IdGenerator::new(),
        }
    }

    /// Licenses matching `filter`, soonest expiry first.
    pub async fn list(&self, filter: &LicenseFilter) -> AppResult<Vec<LicenseView>> {
        let today = self.locale.today();
        Ok(self
            .license_repo
            .find(filter)
            .await?
            .into_iter()
            .map(|l| LicenseView::new(l, today))
            .collect())
    }

    /// Get a license by ID.
    pub async fn get(&self, id: &str) -> AppResult<LicenseView> {
        let license = self
            .license_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("License not found: {id}")))?;
        Ok(LicenseView::new(license, self.locale.today()))
    }

    /// Register a license for an existing facility.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateLicenseInput,
        meta: &RequestMeta,
    ) -> AppResult<LicenseView> {
        Policy::authorize(principal, Permission::ManageFacilities)?;
        input.validate()?;

        if input.expiry_date < input.issue_date {
            return Err(AppError::Validation(
                "expiry_date must not be before issue_date".to_string(),
            ));
        }
        let facility = self.facility_repo.get_by_id(&input.facility_id).await?;

        let model = license::ActiveModel {
            id: Set(self.id_gen.generate()),
            facility_id: Set(facility.id),
            license_number: Set(input.license_number.trim().to_string()),
            license_type: Set(input.license_type.trim().to_string()),
            issuing_authority: Set(input.issuing_authority.trim().to_string()),
            issue_date: Set(input.issue_date),
            expiry_date: Set(input.expiry_date),
            status: Set(input.status.unwrap_or(LicenseStatus::Valid)),
            document_url: Set(non_blank(input.document_url)),
            notes: Set(non_blank(input.notes)),
            created_by: Set(Some(principal.user_id.clone())),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        let license = self.license_repo.create(model).await?;

        tracing::info!(license_id = %license.id, facility_id = %license.facility_id, "License created");
        self.activity
            .log_quietly(
                ActivityEntry::by(principal, "license_created").with_details(json!({
                    "license_id": license.id,
                    "license_number": license.license_number,
                    "facility_id": license.facility_id,
                })),
                meta,
            )
            .await;

        Ok(LicenseView::new(license, self.locale.today()))
    }

    /// Remove a license.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: &str,
        meta: &RequestMeta,
    ) -> AppResult<()> {
        Policy::authorize(principal, Permission::DeleteLicense)?;

        let license = self
            .license_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("License not found: {id}")))?;
        self.license_repo.delete(id).await?;

        tracing::info!(license_id = %id, user_id = %principal.user_id, "License deleted");
        self.activity
            .log_quietly(
                ActivityEntry::by(principal, "license_deleted").with_details(json!({
                    "license_id": license.id,
                    "license_number": license.license_number,
                    "facility_id": license.facility_id,
                })),
                meta,
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Role;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use wilaiety_common::Lang;
    use wilaiety_db::entities::facility;
    use wilaiety_db::repositories::ActivityLogRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(db: DatabaseConnection) -> LicenseService {
        let db = Arc::new(db);
        LicenseService::new(
            LicenseRepository::new(db.clone()),
            FacilityRepository::new(db.clone()),
            ActivityService::new(ActivityLogRepository::new(db)),
            LocaleConfig::default(),
        )
    }

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: "u1".to_string(),
            email: "u1@wilaya.mr".to_string(),
            role,
        }
    }

    fn input(issue: NaiveDate, expiry: NaiveDate) -> CreateLicenseInput {
        CreateLicenseInput {
            facility_id: "f1".to_string(),
            license_number: "LIC-2025-001".to_string(),
            license_type: "exploitation".to_string(),
            issuing_authority: "Wilaya du Trarza".to_string(),
            issue_date: issue,
            expiry_date: expiry,
            status: None,
            document_url: None,
            notes: None,
        }
    }

    #[test]
    fn test_expiry_notice_boundaries() {
        let today = date(2025, 3, 10);
        assert_eq!(
            expiry_notice(date(2025, 3, 7), today),
            ExpiryNotice::Expired { days_ago: 3 }
        );
        assert_eq!(expiry_notice(today, today), ExpiryNotice::ExpiresToday);
        assert_eq!(
            expiry_notice(date(2025, 3, 11), today),
            ExpiryNotice::ExpiringSoon { days: 1 }
        );
        assert_eq!(
            expiry_notice(date(2025, 4, 9), today),
            ExpiryNotice::ExpiringSoon { days: 30 }
        );
        assert_eq!(
            expiry_notice(date(2025, 4, 10), today),
            ExpiryNotice::Valid { days: 31 }
        );
    }

    #[test]
    fn test_expiry_messages() {
        let msg = ExpiryNotice::ExpiresToday.message();
        assert_eq!(msg.resolve(Lang::Fr), "Expire aujourd'hui");
        assert_eq!(msg.resolve(Lang::Ar), "تنتهي اليوم");

        let msg = ExpiryNotice::Expired { days_ago: 4 }.message();
        assert!(msg.fr.contains('4'));
        assert!(msg.ar.contains('4'));
    }

    #[test]
    fn test_notice_serializes_with_kind() {
        let value = serde_json::to_value(ExpiryNotice::ExpiringSoon { days: 5 }).unwrap();
        assert_eq!(value, json!({ "kind": "expiring_soon", "days": 5 }));
    }

    #[tokio::test]
    async fn test_create_rejects_expiry_before_issue() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .create(
                &principal(Role::User),
                input(date(2025, 1, 1), date(2024, 12, 31)),
                &RequestMeta::unknown(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_facility() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<facility::Model>::new()])
            .into_connection();
        let result = service(db)
            .create(
                &principal(Role::User),
                input(date(2025, 1, 1), date(2026, 1, 1)),
                &RequestMeta::unknown(),
            )
            .await;
        assert!(matches!(result, Err(AppError::FacilityNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .delete(&principal(Role::User), "l1", &RequestMeta::unknown())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_keeps_stored_status() {
        let expired_but_marked_valid = license::Model {
            id: "l1".to_string(),
            facility_id: "f1".to_string(),
            license_number: "LIC-1".to_string(),
            license_type: "exploitation".to_string(),
            issuing_authority: "Wali".to_string(),
            issue_date: date(2020, 1, 1),
            expiry_date: date(2021, 1, 1),
            status: LicenseStatus::Valid,
            document_url: None,
            notes: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[expired_but_marked_valid]])
            .into_connection();

        let views = service(db).list(&LicenseFilter::default()).await.unwrap();
        assert_eq!(views[0].license.status, LicenseStatus::Valid);
        assert!(matches!(views[0].expiry_notice, ExpiryNotice::Expired { .. }));
    }
}
