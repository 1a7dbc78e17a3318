use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use tracing::debug;

use crate::db::entities::{prelude::*, probe_log};
use crate::worker::prober::ProbeResult;

/// Persists one probe attempt as an append-only log row.
///
/// Re-delivery of the same result hits the composite primary key and is
/// silently ignored.
pub async fn append_probe_log(db: &DatabaseConnection, result: &ProbeResult) -> Result<(), DbErr> {
    let row = probe_log::ActiveModel {
        issued_at: Set(result.issued_at),
        target_id: Set(result.target_id),
        status: Set(i32::from(result.outcome.status_code())),
        ok: Set(result.outcome.is_ok()),
        duration_ms: Set(result.duration_ms),
        error: Set(result.outcome.error_message().map(str::to_owned)),
    };

    let inserted = ProbeLog::insert(row)
        .on_conflict(
            OnConflict::columns([probe_log::Column::IssuedAt, probe_log::Column::TargetId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted == 0 {
        debug!(
            target_id = result.target_id,
            "probe log entry already recorded, ignoring duplicate"
        );
    }

    Ok(())
}
