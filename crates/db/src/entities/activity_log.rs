//! Activity log entity (append-only audit trail).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(nullable)]
    pub user_email: Option<String>,

    /// Action tag, e.g. `login` or `password_reset_by_admin`.
    #[sea_orm(indexed)]
    pub action: String,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub details: Option<Json>,

    pub ip_address: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
