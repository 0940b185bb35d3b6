//! Display labels for enumerated values.

use serde::Serialize;
use wilaiety_common::{Lang, t};
use wilaiety_db::entities::administrative_division::DivisionType;
use wilaiety_db::entities::facility::{
    FacilityStatus, Jurisdiction, LegalDomain, Ownership, Sector,
};
use wilaiety_db::entities::license::LicenseStatus;

/// A static French/Arabic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub fr: &'static str,
    pub ar: &'static str,
}

impl Label {
    const fn new(fr: &'static str, ar: &'static str) -> Self {
        Self { fr, ar }
    }

    /// Text for the given language.
    #[must_use]
    pub const fn resolve(self, lang: Lang) -> &'static str {
        t(lang, self.fr, self.ar)
    }
}

#[must_use]
pub const fn sector(value: Sector) -> Label {
    match value {
        Sector::Health => Label::new("Santé", "الصحة"),
        Sector::Education => Label::new("Éducation", "التعليم"),
        Sector::Administration => Label::new("Administration", "الإدارة"),
        Sector::Security => Label::new("Sécurité", "الأمن"),
        Sector::Justice => Label::new("Justice", "العدل"),
        Sector::ReligiousAffairs => Label::new("Affaires religieuses", "الشؤون الإسلامية"),
        Sector::YouthSports => Label::new("Jeunesse et sports", "الشباب والرياضة"),
        Sector::Agriculture => Label::new("Agriculture", "الزراعة"),
        Sector::Fisheries => Label::new("Pêche", "الصيد"),
        Sector::WaterEnergy => Label::new("Eau et énergie", "المياه والطاقة"),
        Sector::Infrastructure => Label::new("Infrastructures", "البنى التحتية"),
        Sector::Commerce => Label::new("Commerce", "التجارة"),
        Sector::Other => Label::new("Autre", "أخرى"),
    }
}

#[must_use]
pub const fn jurisdiction(value: Jurisdiction) -> Label {
    match value {
        Jurisdiction::National => Label::new("Nationale", "وطنية"),
        Jurisdiction::Regional => Label::new("Régionale", "جهوية"),
        Jurisdiction::Local => Label::new("Locale", "محلية"),
    }
}

#[must_use]
pub const fn ownership(value: Ownership) -> Label {
    match value {
        Ownership::State => Label::new("État", "الدولة"),
        Ownership::PublicInstitution => Label::new("Établissement public", "مؤسسة عمومية"),
        Ownership::Private => Label::new("Privé", "خاص"),
        Ownership::Mixed => Label::new("Mixte", "مختلط"),
    }
}

#[must_use]
pub const fn legal_domain(value: LegalDomain) -> Label {
    match value {
        LegalDomain::PublicDomain => Label::new("Domaine public", "الملك العام"),
        LegalDomain::PrivateDomain => Label::new("Domaine privé", "الملك الخاص"),
    }
}

#[must_use]
pub const fn facility_status(value: FacilityStatus) -> Label {
    match value {
        FacilityStatus::Active => Label::new("Actif", "نشط"),
        FacilityStatus::Inactive => Label::new("Inactif", "غير نشط"),
        FacilityStatus::UnderConstruction => Label::new("En construction", "قيد الإنشاء"),
        FacilityStatus::Suspended => Label::new("Suspendu", "معلق"),
    }
}

#[must_use]
pub const fn license_status(value: LicenseStatus) -> Label {
    match value {
        LicenseStatus::Valid => Label::new("Valide", "سارية"),
        LicenseStatus::ExpiringSoon => Label::new("Expire bientôt", "تنتهي قريبا"),
        LicenseStatus::Expired => Label::new("Expirée", "منتهية"),
        LicenseStatus::Cancelled => Label::new("Annulée", "ملغاة"),
    }
}

#[must_use]
pub const fn division_type(value: DivisionType) -> Label {
    match value {
        DivisionType::Wilaya => Label::new("Wilaya", "ولاية"),
        DivisionType::Moughataa => Label::new("Moughataa", "مقاطعة"),
        DivisionType::Commune => Label::new("Commune", "بلدية"),
        DivisionType::FreeZone => Label::new("Zone franche", "منطقة حرة"),
    }
}
