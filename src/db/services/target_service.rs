//! Queries over the `targets` table consumed by the dispatch loop and the
//! result recorder.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::db::entities::{prelude::*, target};

/// Fetches every target that is enabled for scheduling.
pub async fn list_active_targets(db: &DatabaseConnection) -> Result<Vec<target::Model>, DbErr> {
    Target::find()
        .filter(target::Column::IsActive.eq(true))
        .order_by_asc(target::Column::Id)
        .all(db)
        .await
}

/// Advances a target's `last_probed_at` to the given completion time.
///
/// The update only applies when the new timestamp is later than the stored
/// one (or nothing is stored yet), so out-of-order completions and duplicate
/// deliveries resolve to last-write-wins.
pub async fn update_last_probed_at(
    db: &DatabaseConnection,
    target_id: i32,
    probed_at: DateTime<Utc>,
) -> Result<(), DbErr> {
    Target::update_many()
        .col_expr(target::Column::LastProbedAt, Expr::value(probed_at))
        .col_expr(target::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(target::Column::Id.eq(target_id))
        .filter(
            Condition::any()
                .add(target::Column::LastProbedAt.is_null())
                .add(target::Column::LastProbedAt.lt(probed_at)),
        )
        .exec(db)
        .await?;

    Ok(())
}
