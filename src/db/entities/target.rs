use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "targets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub url: String,
    pub interval_minutes: i32,
    pub is_active: bool,
    #[sea_orm(nullable)]
    pub last_probed_at: Option<ChronoDateTimeUtc>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::probe_log::Entity")]
    ProbeLog,
}

impl Related<super::probe_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProbeLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
