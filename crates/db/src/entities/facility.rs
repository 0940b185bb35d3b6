//! Facility entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sector a facility belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    #[sea_orm(string_value = "health")]
    Health,
    #[sea_orm(string_value = "education")]
    Education,
    #[sea_orm(string_value = "administration")]
    Administration,
    #[sea_orm(string_value = "security")]
    Security,
    #[sea_orm(string_value = "justice")]
    Justice,
    #[sea_orm(string_value = "religious_affairs")]
    ReligiousAffairs,
    #[sea_orm(string_value = "youth_sports")]
    YouthSports,
    #[sea_orm(string_value = "agriculture")]
    Agriculture,
    #[sea_orm(string_value = "fisheries")]
    Fisheries,
    #[sea_orm(string_value = "water_energy")]
    WaterEnergy,
    #[sea_orm(string_value = "infrastructure")]
    Infrastructure,
    #[sea_orm(string_value = "commerce")]
    Commerce,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Level of government the facility answers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    #[sea_orm(string_value = "national")]
    National,
    #[sea_orm(string_value = "regional")]
    Regional,
    #[sea_orm(string_value = "local")]
    Local,
}

/// Who owns the facility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    #[sea_orm(string_value = "state")]
    State,
    #[sea_orm(string_value = "public_institution")]
    PublicInstitution,
    #[sea_orm(string_value = "private")]
    Private,
    #[sea_orm(string_value = "mixed")]
    Mixed,
}

/// Legal domain of the land the facility sits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LegalDomain {
    #[sea_orm(string_value = "public_domain")]
    PublicDomain,
    #[sea_orm(string_value = "private_domain")]
    PrivateDomain,
}

/// Operating status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "under_construction")]
    UnderConstruction,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

/// A registered government-affiliated establishment.
///
/// Facilities are never deleted; retiring one means setting its status.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name_fr: String,

    pub name_ar: String,

    #[sea_orm(indexed)]
    pub sector: Sector,

    pub jurisdiction: Jurisdiction,

    pub ownership: Ownership,

    pub legal_domain: LegalDomain,

    /// Division the facility is located in.
    #[sea_orm(nullable, indexed)]
    pub division_id: Option<String>,

    /// Free-text region, pre-filled from the division.
    #[sea_orm(nullable)]
    pub region: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// `"lat,lng"`.
    #[sea_orm(nullable)]
    pub gps_coordinates: Option<String>,

    #[sea_orm(indexed)]
    pub status: FacilityStatus,

    /// Public URL in the `facility-images` bucket.
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    #[sea_orm(nullable)]
    pub website_url: Option<String>,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::license::Entity")]
    Licenses,
    #[sea_orm(
        belongs_to = "super::administrative_division::Entity",
        from = "Column::DivisionId",
        to = "super::administrative_division::Column::Id",
        on_delete = "SetNull"
    )]
    Division,
}

impl Related<super::license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licenses.def()
    }
}

impl Related<super::administrative_division::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Division.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
