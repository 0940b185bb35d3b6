//! Administrative division entity.
//!
//! Divisions form a tree: wilaya → moughataa → commune. Free zones hang
//! directly under a wilaya.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of administrative unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DivisionType {
    /// Region.
    #[sea_orm(string_value = "wilaya")]
    Wilaya,
    /// Department, inside a wilaya.
    #[sea_orm(string_value = "moughataa")]
    Moughataa,
    /// Municipality, inside a moughataa.
    #[sea_orm(string_value = "commune")]
    Commune,
    /// Special economic zone.
    #[sea_orm(string_value = "free_zone")]
    FreeZone,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "administrative_divisions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Enclosing division, `None` for top-level units.
    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<String>,

    pub name_fr: String,

    pub name_ar: String,

    /// Official code (e.g. ONS code).
    #[sea_orm(nullable)]
    pub code: Option<String>,

    pub division_type: DivisionType,

    /// `"lat,lng"` of the administrative seat.
    #[sea_orm(nullable)]
    pub gps_coordinates: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "super::facility::Entity")]
    Facilities,
}

impl Related<super::facility::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Facilities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
