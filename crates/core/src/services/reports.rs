//! Dashboard figures and spreadsheet exports.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;
use wilaiety_common::config::LocaleConfig;
use wilaiety_common::{AppResult, Lang, t};
use wilaiety_db::entities::facility::{FacilityStatus, Sector};
use wilaiety_db::entities::license::LicenseStatus;
use wilaiety_db::repositories::{
    AuthUserRepository, DivisionRepository, FacilityFilter, FacilityRepository, LicenseFilter,
    LicenseRepository,
};

use crate::labels::{self, Label};
use crate::policy::{Permission, Policy, Principal};
use crate::services::licenses::{EXPIRY_WARNING_DAYS, LicenseView};

/// Byte order mark so spreadsheet software detects UTF-8 (Arabic text).
const UTF8_BOM: char = '\u{feff}';

/// Row counts across the registry.
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub facilities: u64,
    pub licenses: u64,
    pub divisions: u64,
    pub users: u64,
}

/// Count for one enumerated value.
#[derive(Debug, Clone, Serialize)]
pub struct CountBy<K> {
    pub key: K,
    pub label: Label,
    pub count: i64,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub totals: Totals,
    pub facilities_by_sector: Vec<CountBy<Sector>>,
    pub facilities_by_status: Vec<CountBy<FacilityStatus>>,
    pub licenses_by_status: Vec<CountBy<LicenseStatus>>,
    /// Licenses whose expiry date falls within the warning window.
    pub expiring_licenses: Vec<LicenseView>,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    facility_repo: FacilityRepository,
    license_repo: LicenseRepository,
    division_repo: DivisionRepository,
    user_repo: AuthUserRepository,
    locale: LocaleConfig,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        facility_repo: FacilityRepository,
        license_repo: LicenseRepository,
        division_repo: DivisionRepository,
        user_repo: AuthUserRepository,
        locale: LocaleConfig,
    ) -> Self {
        Self {
            facility_repo,
            license_repo,
            division_repo,
            user_repo,
            locale,
        }
    }

    /// Dashboard figures.
    pub async fn dashboard(&self, principal: &Principal) -> AppResult<DashboardStats> {
        Policy::authorize(principal, Permission::ViewRegistry)?;

        let totals = Totals {
            facilities: self.facility_repo.count(&FacilityFilter::default()).await?,
            licenses: self.license_repo.count().await?,
            divisions: self.division_repo.count().await?,
            users: self.user_repo.count().await?,
        };

        let facilities_by_sector = counted(self.facility_repo.count_by_sector().await?, labels::sector);
        let facilities_by_status =
            counted(self.facility_repo.count_by_status().await?, labels::facility_status);
        let licenses_by_status =
            counted(self.license_repo.count_by_status().await?, labels::license_status);

        let today = self.locale.today();
        let expiring_licenses = self
            .license_repo
            .find_expiring_between(today, today + Duration::days(EXPIRY_WARNING_DAYS))
            .await?
            .into_iter()
            .map(|l| LicenseView::new(l, today))
            .collect();

        Ok(DashboardStats {
            totals,
            facilities_by_sector,
            facilities_by_status,
            licenses_by_status,
            expiring_licenses,
        })
    }

    /// Every facility as CSV, headers and enum values in `lang`.
    pub async fn facilities_csv(&self, principal: &Principal, lang: Lang) -> AppResult<String> {
        Policy::authorize(principal, Permission::ExportReports)?;

        let facilities = self.facility_repo.find_all(&FacilityFilter::default()).await?;

        let mut csv = CsvWriter::new();
        csv.row([
            t(lang, "Nom (FR)", "الاسم (فرنسية)"),
            t(lang, "Nom (AR)", "الاسم (عربية)"),
            t(lang, "Secteur", "القطاع"),
            t(lang, "Tutelle", "التبعية"),
            t(lang, "Propriété", "الملكية"),
            t(lang, "Domaine", "الطبيعة القانونية"),
            t(lang, "Statut", "الحالة"),
            t(lang, "Région", "المنطقة"),
            t(lang, "Adresse", "العنوان"),
            t(lang, "Coordonnées GPS", "الإحداثيات"),
            t(lang, "Site web", "الموقع الإلكتروني"),
            t(lang, "Créé le", "تاريخ الإنشاء"),
        ]);
        for f in &facilities {
            let created_at = f.created_at.format("%Y-%m-%d").to_string();
            csv.row([
                f.name_fr.as_str(),
                f.name_ar.as_str(),
                labels::sector(f.sector).resolve(lang),
                labels::jurisdiction(f.jurisdiction).resolve(lang),
                labels::ownership(f.ownership).resolve(lang),
                labels::legal_domain(f.legal_domain).resolve(lang),
                labels::facility_status(f.status).resolve(lang),
                f.region.as_deref().unwrap_or_default(),
                f.address.as_deref().unwrap_or_default(),
                f.gps_coordinates.as_deref().unwrap_or_default(),
                f.website_url.as_deref().unwrap_or_default(),
                created_at.as_str(),
            ]);
        }

        tracing::debug!(rows = facilities.len(), %lang, "Facilities exported");
        Ok(csv.finish())
    }

    /// Every license as CSV, with the owning facility's name.
    pub async fn licenses_csv(&self, principal: &Principal, lang: Lang) -> AppResult<String> {
        Policy::authorize(principal, Permission::ExportReports)?;

        let licenses = self.license_repo.find(&LicenseFilter::default()).await?;
        let facility_names: HashMap<String, String> = self
            .facility_repo
            .find_all(&FacilityFilter::default())
            .await?
            .into_iter()
            .map(|f| {
                let name = t(lang, &f.name_fr, &f.name_ar).to_string();
                (f.id, name)
            })
            .collect();
        let today = self.locale.today();

        let mut csv = CsvWriter::new();
        csv.row([
            t(lang, "Numéro", "الرقم"),
            t(lang, "Établissement", "المنشأة"),
            t(lang, "Type", "النوع"),
            t(lang, "Autorité", "الجهة المصدرة"),
            t(lang, "Délivrée le", "تاريخ الإصدار"),
            t(lang, "Expire le", "تاريخ الانتهاء"),
            t(lang, "Statut", "الحالة"),
            t(lang, "Échéance", "المدة المتبقية"),
        ]);
        for l in &licenses {
            let view = LicenseView::new(l.clone(), today);
            let issue_date = l.issue_date.to_string();
            let expiry_date = l.expiry_date.to_string();
            csv.row([
                l.license_number.as_str(),
                facility_names
                    .get(&l.facility_id)
                    .map_or(l.facility_id.as_str(), String::as_str),
                l.license_type.as_str(),
                l.issuing_authority.as_str(),
                issue_date.as_str(),
                expiry_date.as_str(),
                labels::license_status(l.status).resolve(lang),
                view.expiry_message.resolve(lang),
            ]);
        }

        tracing::debug!(rows = licenses.len(), %lang, "Licenses exported");
        Ok(csv.finish())
    }
}

fn counted<K: Copy>(rows: Vec<(K, i64)>, label: fn(K) -> Label) -> Vec<CountBy<K>> {
    let mut out: Vec<CountBy<K>> = rows
        .into_iter()
        .map(|(key, count)| CountBy {
            key,
            label: label(key),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Minimal RFC 4180 writer.
struct CsvWriter {
    out: String,
}

impl CsvWriter {
    fn new() -> Self {
        let mut out = String::new();
        out.push(UTF8_BOM);
        Self { out }
    }

    fn row<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>) {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            push_field(&mut self.out, field);
        }
        self.out.push_str("\r\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
