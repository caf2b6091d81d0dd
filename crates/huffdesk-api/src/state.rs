//! Shared state handed to every handler.

use huffdesk_jobs::JobOrchestrator;
use huffdesk_store::{ArtifactStore, SweepPolicy};
use huffdesk_telemetry::Metrics;

pub(crate) struct ApiState {
    pub(crate) orchestrator: JobOrchestrator,
    pub(crate) telemetry: Metrics,
    pub(crate) sweep_policy: SweepPolicy,
}

impl ApiState {
    pub(crate) const fn new(
        orchestrator: JobOrchestrator,
        telemetry: Metrics,
        sweep_policy: SweepPolicy,
    ) -> Self {
        Self {
            orchestrator,
            telemetry,
            sweep_policy,
        }
    }

    pub(crate) const fn store(&self) -> &ArtifactStore {
        self.orchestrator.store()
    }
}
