//! The dispatch loop: wakes on a fixed cadence, evaluates which targets are
//! due, and fires one independent probe task per due target.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::db::entities::target;

use super::prober;
use super::recorder;
use super::store::{StoreError, TargetStore};

pub struct Scheduler<S: TargetStore> {
    store: Arc<S>,
    http: reqwest::Client,
    tick_interval: Duration,
    // Targets with a probe currently outstanding. Claimed on dispatch,
    // released by the probe task after its result is recorded.
    in_flight: Arc<DashMap<i32, ()>>,
}

impl<S: TargetStore> Scheduler<S> {
    pub fn new(store: Arc<S>, http: reqwest::Client, tick_interval: Duration) -> Self {
        Self {
            store,
            http,
            tick_interval,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Runs the loop until the process shuts down. Ticks are aligned to the
    /// next wall-clock multiple of the cadence, so the default 60s cadence
    /// fires at second 0 of every minute.
    pub async fn run(self: Arc<Self>) {
        let period_ms = self.tick_interval.as_millis() as i64;
        let delay = delay_until_first_tick(Utc::now().timestamp_millis(), period_ms);
        let first_tick = Instant::now() + Duration::from_millis(delay);
        let mut ticker = interval_at(first_tick, self.tick_interval);

        info!(
            tick_seconds = self.tick_interval.as_secs(),
            "dispatch loop started"
        );

        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!(error = %err, "could not list targets, abandoning tick");
            }
        }
    }

    /// One scheduling pass: fetch active targets and dispatch every due one
    /// that has no probe outstanding. Returns to the caller without waiting
    /// for any probe to finish.
    pub(crate) async fn tick(&self) -> Result<(), StoreError> {
        let targets = self.store.list_active_targets().await?;
        let now = Utc::now();

        for target in targets {
            if !is_due(&target, now) {
                continue;
            }
            if !self.claim(target.id) {
                debug!(
                    target_id = target.id,
                    url = %target.url,
                    "previous probe still in flight, skipping"
                );
                continue;
            }

            debug!(
                target_id = target.id,
                name = %target.name,
                url = %target.url,
                "dispatching probe"
            );
            let store = Arc::clone(&self.store);
            let client = self.http.clone();
            let in_flight = Arc::clone(&self.in_flight);
            tokio::spawn(async move {
                let result = prober::probe(&client, target.id, &target.url).await;
                recorder::record(store.as_ref(), &result).await;
                in_flight.remove(&target.id);
            });
        }

        Ok(())
    }

    /// Marks a target as in flight. Returns false when an earlier probe of
    /// the same target has not completed yet.
    fn claim(&self, target_id: i32) -> bool {
        match self.in_flight.entry(target_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(());
                true
            }
        }
    }
}

/// A target is due when at least `interval_minutes` have elapsed since its
/// last probe; the exact boundary counts. A target never probed is always
/// due.
pub(crate) fn is_due(target: &target::Model, now: DateTime<Utc>) -> bool {
    match target.last_probed_at {
        None => true,
        Some(last) => {
            let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
            elapsed_ms >= i64::from(target.interval_minutes) * 60_000
        }
    }
}

/// Milliseconds until the next wall-clock multiple of the tick period.
/// Returns 0 when `now` already sits on a boundary.
pub(crate) fn delay_until_first_tick(now_ms: i64, period_ms: i64) -> u64 {
    let rem = now_ms.rem_euclid(period_ms);
    ((period_ms - rem) % period_ms) as u64
}
