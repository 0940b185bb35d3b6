//! Facility registry service.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
use wilaiety_common::{
    AppError, AppResult, Bucket, IdGenerator, Lang, StorageBackend, parse_gps, storage_key, t,
};
use wilaiety_db::entities::facility::{
    self, FacilityStatus, Jurisdiction, LegalDomain, Ownership, Sector,
};
use wilaiety_db::repositories::{DivisionRepository, FacilityFilter, FacilityRepository};

use crate::labels::{self, Label};
use crate::policy::{Permission, Policy, Principal};
use crate::services::activity::{ActivityEntry, ActivityService, RequestMeta};
use crate::services::{check_gps, ensure_image, non_blank, required_name};

/// Largest page a listing returns.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A page of facilities.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityPage {
    pub items: Vec<facility::Model>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// A facility placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub name_fr: String,
    pub name_ar: String,
    pub sector: Sector,
    pub status: FacilityStatus,
    pub lat: f64,
    pub lng: f64,
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Muted,
    Info,
    Danger,
}

/// Label and tone shown for a facility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: Label,
    pub tone: BadgeTone,
}

/// Badge for a facility status.
#[must_use]
pub const fn status_badge(status: FacilityStatus) -> StatusBadge {
    let tone = match status {
        FacilityStatus::Active => BadgeTone::Success,
        FacilityStatus::Inactive => BadgeTone::Muted,
        FacilityStatus::UnderConstruction => BadgeTone::Info,
        FacilityStatus::Suspended => BadgeTone::Danger,
    };
    StatusBadge {
        label: labels::facility_status(status),
        tone,
    }
}

/// Input for registering a facility.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFacilityInput {
    #[validate(length(min = 1, max = 256))]
    pub name_fr: String,
    #[validate(length(min = 1, max = 256))]
    pub name_ar: String,
    pub sector: Sector,
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: Jurisdiction,
    #[serde(default = "default_ownership")]
    pub ownership: Ownership,
    #[serde(default = "default_legal_domain")]
    pub legal_domain: LegalDomain,
    #[serde(default = "default_status")]
    pub status: FacilityStatus,
    pub division_id: Option<String>,
    #[validate(length(max = 256))]
    pub region: Option<String>,
    #[validate(length(max = 1024))]
    pub address: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    pub gps_coordinates: Option<String>,
    #[validate(length(max = 2048))]
    pub website_url: Option<String>,
}

const fn default_jurisdiction() -> Jurisdiction {
    Jurisdiction::Local
}

const fn default_ownership() -> Ownership {
    Ownership::State
}

const fn default_legal_domain() -> LegalDomain {
    LegalDomain::PublicDomain
}

const fn default_status() -> FacilityStatus {
    FacilityStatus::Active
}

/// Partial edit of a facility.
///
/// Absent fields are left alone; blank strings clear optional text.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFacilityInput {
    #[validate(length(min = 1, max = 256))]
    pub name_fr: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name_ar: Option<String>,
    pub sector: Option<Sector>,
    pub jurisdiction: Option<Jurisdiction>,
    pub ownership: Option<Ownership>,
    pub legal_domain: Option<LegalDomain>,
    pub status: Option<FacilityStatus>,
    pub division_id: Option<String>,
    #[validate(length(max = 256))]
    pub region: Option<String>,
    #[validate(length(max = 1024))]
    pub address: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    pub gps_coordinates: Option<String>,
    pub website_url: Option<String>,
}

/// Facility service.
#[derive(Clone)]
pub struct FacilityService {
    facility_repo: FacilityRepository,
    division_repo: DivisionRepository,
    activity: ActivityService,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl FacilityService {
    /// Create a new facility service.
    #[must_use]
    pub fn new(
        facility_repo: FacilityRepository,
        division_repo: DivisionRepository,
        activity: ActivityService,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            facility_repo,
            division_repo,
            activity,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// One page of facilities matching `filter`.
    pub async fn list(
        &self,
        filter: &FacilityFilter,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<FacilityPage> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);

        let items = self.facility_repo.find(filter, limit, offset).await?;
        let total = self.facility_repo.count(filter).await?;

        Ok(FacilityPage {
            items,
            total,
            limit,
            offset,
        })
    }

    /// Every facility of one sector.
    pub async fn list_by_sector(&self, sector: Sector) -> AppResult<Vec<facility::Model>> {
        self.facility_repo
            .find_all(&FacilityFilter {
                sector: Some(sector),
                ..FacilityFilter::default()
            })
            .await
    }

    /// Get a facility by ID.
    pub async fn get(&self, id: &str) -> AppResult<facility::Model> {
        self.facility_repo.get_by_id(id).await
    }

    /// Register a facility.
    ///
    /// A blank region or coordinate string is filled from the chosen
    /// division.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateFacilityInput,
        lang: Lang,
        meta: &RequestMeta,
    ) -> AppResult<facility::Model> {
        Policy::authorize(principal, Permission::ManageFacilities)?;
        input.validate()?;

        let name_fr = required_name(&input.name_fr, "name_fr")?;
        let name_ar = required_name(&input.name_ar, "name_ar")?;

        let division_id = non_blank(input.division_id);
        let (region, gps_coordinates) = self
            .prefill_from_division(
                division_id.as_deref(),
                non_blank(input.region),
                non_blank(input.gps_coordinates),
                lang,
            )
            .await?;
        check_gps(gps_coordinates.as_deref())?;

        let model = facility::ActiveModel {
            id: Set(self.id_gen.generate()),
            name_fr: Set(name_fr),
            name_ar: Set(name_ar),
            sector: Set(input.sector),
            jurisdiction: Set(input.jurisdiction),
            ownership: Set(input.ownership),
            legal_domain: Set(input.legal_domain),
            division_id: Set(division_id),
            region: Set(region),
            address: Set(non_blank(input.address)),
            description: Set(non_blank(input.description)),
            gps_coordinates: Set(gps_coordinates),
            status: Set(input.status),
            image_url: Set(None),
            website_url: Set(non_blank(input.website_url)),
            created_by: Set(Some(principal.user_id.clone())),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        let facility = self.facility_repo.create(model).await?;

        tracing::info!(facility_id = %facility.id, user_id = %principal.user_id, "Facility created");
        self.activity
            .log_quietly(
                ActivityEntry::by(principal, "facility_created").with_details(json!({
                    "facility_id": facility.id,
                    "name_fr": facility.name_fr,
                })),
                meta,
            )
            .await;

        Ok(facility)
    }

    /// Edit a facility.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &str,
        input: UpdateFacilityInput,
        lang: Lang,
        meta: &RequestMeta,
    ) -> AppResult<facility::Model> {
        Policy::authorize(principal, Permission::ManageFacilities)?;
        input.validate()?;

        let existing = self.facility_repo.get_by_id(id).await?;

        let division_id = match input.division_id {
            Some(d) => non_blank(Some(d)),
            None => existing.division_id.clone(),
        };
        let region = match input.region {
            Some(r) => non_blank(Some(r)),
            None => existing.region.clone(),
        };
        let gps_coordinates = match input.gps_coordinates {
            Some(g) => non_blank(Some(g)),
            None => existing.gps_coordinates.clone(),
        };
        let (region, gps_coordinates) = self
            .prefill_from_division(division_id.as_deref(), region, gps_coordinates, lang)
            .await?;
        check_gps(gps_coordinates.as_deref())?;

        let mut active: facility::ActiveModel = existing.into();
        if let Some(name_fr) = &input.name_fr {
            active.name_fr = Set(required_name(name_fr, "name_fr")?);
        }
        if let Some(name_ar) = &input.name_ar {
            active.name_ar = Set(required_name(name_ar, "name_ar")?);
        }
        if let Some(sector) = input.sector {
            active.sector = Set(sector);
        }
        if let Some(jurisdiction) = input.jurisdiction {
            active.jurisdiction = Set(jurisdiction);
        }
        if let Some(ownership) = input.ownership {
            active.ownership = Set(ownership);
        }
        if let Some(legal_domain) = input.legal_domain {
            active.legal_domain = Set(legal_domain);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(address) = input.address {
            active.address = Set(non_blank(Some(address)));
        }
        if let Some(description) = input.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(website_url) = input.website_url {
            active.website_url = Set(non_blank(Some(website_url)));
        }
        active.division_id = Set(division_id);
        active.region = Set(region);
        active.gps_coordinates = Set(gps_coordinates);
        active.updated_at = Set(Some(Utc::now()));

        let facility = self.facility_repo.update(active).await?;

        self.activity
            .log_quietly(
                ActivityEntry::by(principal, "facility_updated")
                    .with_details(json!({ "facility_id": facility.id })),
                meta,
            )
            .await;

        Ok(facility)
    }

    /// Store a photo for a facility, replacing any previous one.
    pub async fn upload_image(
        &self,
        principal: &Principal,
        id: &str,
        data: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> AppResult<facility::Model> {
        Policy::authorize(principal, Permission::ManageFacilities)?;
        ensure_image(content_type, data)?;

        let existing = self.facility_repo.get_by_id(id).await?;
        let key = storage_key(id, file_name);
        let uploaded = self
            .storage
            .upload(Bucket::FacilityImages, &key, data, content_type)
            .await?;

        let mut active: facility::ActiveModel = existing.into();
        active.image_url = Set(Some(uploaded.url));
        active.updated_at = Set(Some(Utc::now()));
        self.facility_repo.update(active).await
    }

    /// Every facility whose coordinates parse.
    pub async fn map_points(&self) -> AppResult<Vec<MapPoint>> {
        let facilities = self.facility_repo.find_with_coordinates().await?;
        Ok(facilities.into_iter().filter_map(map_point).collect())
    }

    async fn prefill_from_division(
        &self,
        division_id: Option<&str>,
        region: Option<String>,
        gps_coordinates: Option<String>,
        lang: Lang,
    ) -> AppResult<(Option<String>, Option<String>)> {
        let Some(division_id) = division_id else {
            return Ok((region, gps_coordinates));
        };

        // Always resolved: an unknown division is NotFound even with nothing to fill.
        let division = self
            .division_repo
            .find_by_id(division_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Division not found: {division_id}")))?;

        let region =
            region.or_else(|| Some(t(lang, &division.name_fr, &division.name_ar).to_string()));
        let gps_coordinates = gps_coordinates.or(division.gps_coordinates);
        Ok((region, gps_coordinates))
    }
}

fn map_point(f: facility::Model) -> Option<MapPoint> {
    let (lat, lng) = parse_gps(f.gps_coordinates.as_deref())?;
    Some(MapPoint {
        id: f.id,
        name_fr: f.name_fr,
        name_ar: f.name_ar,
        sector: f.sector,
        status: f.status,
        lat,
        lng,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Role;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use wilaiety_common::LocalStorage;
    use wilaiety_db::entities::administrative_division::{self, DivisionType};
    use wilaiety_db::repositories::ActivityLogRepository;

    fn service(db: DatabaseConnection) -> FacilityService {
        service_on(Arc::new(db))
    }

    fn service_on(db: Arc<DatabaseConnection>) -> FacilityService {
        FacilityService::new(
            FacilityRepository::new(db.clone()),
            DivisionRepository::new(db.clone()),
            ActivityService::new(ActivityLogRepository::new(db)),
            Arc::new(LocalStorage::new(
                std::env::temp_dir().join("wilaiety-facilities-test"),
                "/storage".to_string(),
            )),
        )
    }

    fn agent() -> Principal {
        Principal {
            user_id: "u1".to_string(),
            email: "agent@wilaya.mr".to_string(),
            role: Role::User,
        }
    }

    fn facility_row(id: &str, gps: Option<&str>) -> facility::Model {
        facility::Model {
            id: id.to_string(),
            name_fr: "Hôpital régional".to_string(),
            name_ar: "المستشفى الجهوي".to_string(),
            sector: Sector::Health,
            jurisdiction: Jurisdiction::Regional,
            ownership: Ownership::State,
            legal_domain: LegalDomain::PublicDomain,
            division_id: None,
            region: None,
            address: None,
            description: None,
            gps_coordinates: gps.map(str::to_string),
            status: FacilityStatus::Active,
            image_url: None,
            website_url: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn division_row() -> administrative_division::Model {
        administrative_division::Model {
            id: "d1".to_string(),
            parent_id: None,
            name_fr: "Rosso".to_string(),
            name_ar: "روصو".to_string(),
            code: None,
            division_type: DivisionType::Moughataa,
            gps_coordinates: Some("16.5138,-15.8050".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn create_input() -> CreateFacilityInput {
        CreateFacilityInput {
            name_fr: "Hôpital régional".to_string(),
            name_ar: "المستشفى الجهوي".to_string(),
            sector: Sector::Health,
            jurisdiction: Jurisdiction::Regional,
            ownership: Ownership::State,
            legal_domain: LegalDomain::PublicDomain,
            status: FacilityStatus::Active,
            division_id: None,
            region: None,
            address: None,
            description: None,
            gps_coordinates: None,
            website_url: None,
        }
    }

    #[test]
    fn test_status_badge_tones() {
        assert_eq!(status_badge(FacilityStatus::Active).tone, BadgeTone::Success);
        assert_eq!(status_badge(FacilityStatus::Inactive).tone, BadgeTone::Muted);
        assert_eq!(
            status_badge(FacilityStatus::UnderConstruction).tone,
            BadgeTone::Info
        );
        assert_eq!(status_badge(FacilityStatus::Suspended).tone, BadgeTone::Danger);
        assert_eq!(
            status_badge(FacilityStatus::Suspended).label.resolve(Lang::Ar),
            "معلق"
        );
    }

    #[test]
    fn test_check_gps() {
        assert!(check_gps(None).is_ok());
        assert!(check_gps(Some("18.08,-15.97")).is_ok());
        assert!(check_gps(Some("abc,def")).is_err());
    }

    #[tokio::test]
    async fn test_map_points_skip_unparseable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                facility_row("f1", Some("20.9420,-17.0470")),
                facility_row("f2", Some("abc,def")),
                facility_row("f3", Some("20.9")),
            ]])
            .into_connection();

        let points = service(db).map_points().await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "f1");
        assert_eq!((points[0].lat, points[0].lng), (20.9420, -17.0470));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_gps() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = CreateFacilityInput {
            gps_coordinates: Some("north,west".to_string()),
            ..create_input()
        };

        let result = service(db)
            .create(&agent(), input, Lang::Fr, &RequestMeta::unknown())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = CreateFacilityInput {
            name_ar: "   ".to_string(),
            ..create_input()
        };

        let result = service(db)
            .create(&agent(), input, Lang::Fr, &RequestMeta::unknown())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_prefill_from_division_uses_request_language() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[division_row()]])
            .into_connection();

        let (region, gps) = service(db)
            .prefill_from_division(Some("d1"), None, None, Lang::Ar)
            .await
            .unwrap();
        assert_eq!(region.as_deref(), Some("روصو"));
        assert_eq!(gps.as_deref(), Some("16.5138,-15.8050"));
    }

    #[tokio::test]
    async fn test_prefill_keeps_explicit_values() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[division_row()]])
            .into_connection();

        let (region, gps) = service(db)
            .prefill_from_division(
                Some("d1"),
                Some("Keur Macène".to_string()),
                Some("16.55,-16.23".to_string()),
                Lang::Fr,
            )
            .await
            .unwrap();
        assert_eq!(region.as_deref(), Some("Keur Macène"));
        assert_eq!(gps.as_deref(), Some("16.55,-16.23"));
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[facility_row("f1", None)]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(1)),
            }]])
            .into_connection();

        let page = service(db)
            .list(&FacilityFilter::default(), Some(1000), None)
            .await
            .unwrap();
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_division() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<administrative_division::Model>::new()])
                .into_connection(),
        );
        let input = CreateFacilityInput {
            division_id: Some("ghost".to_string()),
            region: Some("Trarza".to_string()),
            gps_coordinates: Some("16.5,-15.8".to_string()),
            ..create_input()
        };

        let service = service_on(db.clone());
        let result = service
            .create(&agent(), input, Lang::Fr, &RequestMeta::unknown())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        drop(service);

        // Only the division lookup ran; nothing was inserted.
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(log[0].statements()[0].sql.contains("administrative_divisions"));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_division() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[facility_row("f1", Some("20.9,-17.0"))]])
            .append_query_results([Vec::<administrative_division::Model>::new()])
            .into_connection();
        let input = UpdateFacilityInput {
            division_id: Some("ghost".to_string()),
            region: Some("Trarza".to_string()),
            ..UpdateFacilityInput::default()
        };

        let result = service(db)
            .update(&agent(), "f1", input, Lang::Fr, &RequestMeta::unknown())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
