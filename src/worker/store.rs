//! The target-store contract consumed by the dispatch loop and the result
//! recorder, plus its SeaORM-backed implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};

use crate::db::entities::target;
use crate::db::services;

use super::prober::ProbeResult;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("target store unavailable: {0}")]
    Unavailable(#[from] DbErr),
}

/// The three operations the scheduling core needs from persistence.
///
/// Production uses [`DbTargetStore`]; tests substitute an in-memory fake.
#[async_trait]
pub trait TargetStore: Send + Sync + 'static {
    async fn list_active_targets(&self) -> Result<Vec<target::Model>, StoreError>;

    async fn update_last_probed_at(
        &self,
        target_id: i32,
        probed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn append_probe_log(&self, result: &ProbeResult) -> Result<(), StoreError>;
}

/// Store implementation over the process-wide database connection.
pub struct DbTargetStore {
    db: DatabaseConnection,
}

impl DbTargetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TargetStore for DbTargetStore {
    async fn list_active_targets(&self) -> Result<Vec<target::Model>, StoreError> {
        Ok(services::list_active_targets(&self.db).await?)
    }

    async fn update_last_probed_at(
        &self,
        target_id: i32,
        probed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(services::update_last_probed_at(&self.db, target_id, probed_at).await?)
    }

    async fn append_probe_log(&self, result: &ProbeResult) -> Result<(), StoreError> {
        Ok(services::append_probe_log(&self.db, result).await?)
    }
}
