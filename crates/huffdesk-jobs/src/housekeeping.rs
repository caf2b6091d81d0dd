//! Retention sweeps, on demand and on a schedule.

use std::time::Duration;

use huffdesk_store::{ArtifactClass, ArtifactStore, SweepPolicy, SweepReport};
use huffdesk_telemetry::Metrics;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

/// Run one sweep with `policy` and record its outcome in `metrics`.
pub async fn sweep_artifacts(
    store: &ArtifactStore,
    metrics: &Metrics,
    policy: SweepPolicy,
) -> SweepReport {
    let report = store.sweep_now(policy).await;
    for class in ArtifactClass::ALL {
        let removed = report.removed(class);
        if removed > 0 {
            metrics.add_swept(class.dir_name(), removed);
        }
    }
    if report.failures > 0 {
        metrics.inc_sweep_failure();
        warn!(failures = report.failures, "artifact sweep left entries behind");
    }
    report
}

/// Spawn a task sweeping every `every` until aborted.
///
/// The first pass runs one full period after the call. Failed removals are logged and
/// retried on the next pass.
#[must_use]
pub fn spawn_sweep_scheduler(
    store: ArtifactStore,
    metrics: Metrics,
    policy: SweepPolicy,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = every.as_secs(),
            max_age_secs = policy.max_age.as_secs(),
            "scheduled artifact sweep enabled"
        );
        loop {
            ticker.tick().await;
            let _ = sweep_artifacts(&store, &metrics, policy).await;
        }
    })
}
