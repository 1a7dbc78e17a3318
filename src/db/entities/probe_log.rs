use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One append-only log row per probe attempt. The composite primary key
/// doubles as the dedup key for duplicate result delivery.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "probe_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub issued_at: ChronoDateTimeUtc,
    #[sea_orm(primary_key, auto_increment = false)]
    pub target_id: i32,
    pub status: i32,
    pub ok: bool,
    pub duration_ms: i64,
    #[sea_orm(nullable)]
    pub error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::target::Entity",
        from = "Column::TargetId",
        to = "super::target::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Target,
}

impl Related<super::target::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Target.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
