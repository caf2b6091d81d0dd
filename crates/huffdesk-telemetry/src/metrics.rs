//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Counters cover HTTP traffic, job outcomes, codec invocations and retention sweeps.

use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Job kinds tracked by `jobs_total`.
pub const JOB_KIND_LABELS: [&str; 2] = ["compress", "extract"];

/// Terminal outcome recorded for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcomeLabel {
    /// The job produced its artifacts.
    Succeeded,
    /// The job ended with a classified failure.
    Failed,
}

impl JobOutcomeLabel {
    /// Label value used in the Prometheus series.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    jobs_total: IntCounterVec,
    codec_invocations_total: IntCounterVec,
    jobs_in_flight: IntGauge,
    artifacts_swept_total: IntCounterVec,
    sweep_failures_total: IntCounter,
}

/// Holds one unit of `jobs_in_flight`; cancelled jobs release it on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    gauge: IntGauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Jobs currently waiting on the codec.
    pub jobs_in_flight: i64,
    /// Jobs that completed successfully.
    pub jobs_succeeded_total: u64,
    /// Jobs that ended with a failure record.
    pub jobs_failed_total: u64,
    /// Sweep passes that hit at least one removal failure.
    pub sweep_failures_total: u64,
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::Collector {
            operation: "build",
            name,
            source,
        })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Collector {
            operation: "register",
            name,
            source,
        })
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let jobs_total = counter_vec(
            "jobs_total",
            "Compression jobs processed by kind and outcome",
            &["kind", "outcome"],
        )?;
        let codec_invocations_total = counter_vec(
            "codec_invocations_total",
            "Codec subprocess invocations by mode and outcome",
            &["mode", "outcome"],
        )?;
        let jobs_in_flight = IntGauge::with_opts(Opts::new(
            "jobs_in_flight",
            "Jobs currently waiting on the codec",
        ))
        .map_err(|source| TelemetryError::Collector {
            operation: "build",
            name: "jobs_in_flight",
            source,
        })?;
        let artifacts_swept_total = counter_vec(
            "artifacts_swept_total",
            "Artifacts removed by the retention sweep",
            &["class"],
        )?;
        let sweep_failures_total = IntCounter::with_opts(Opts::new(
            "sweep_failures_total",
            "Sweep passes with at least one removal failure",
        ))
        .map_err(|source| TelemetryError::Collector {
            operation: "build",
            name: "sweep_failures_total",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "jobs_total", &jobs_total)?;
        register(&registry, "codec_invocations_total", &codec_invocations_total)?;
        register(&registry, "jobs_in_flight", &jobs_in_flight)?;
        register(&registry, "artifacts_swept_total", &artifacts_swept_total)?;
        register(&registry, "sweep_failures_total", &sweep_failures_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                jobs_total,
                codec_invocations_total,
                jobs_in_flight,
                artifacts_swept_total,
                sweep_failures_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record a job reaching a terminal state.
    pub fn inc_job(&self, kind: &str, outcome: JobOutcomeLabel) {
        self.inner
            .jobs_total
            .with_label_values(&[kind, outcome.as_str()])
            .inc();
    }

    /// Record a codec invocation; `outcome` is `ok`, `timeout`, `exit_status` or `spawn`.
    pub fn inc_codec_invocation(&self, mode: &str, outcome: &str) {
        self.inner
            .codec_invocations_total
            .with_label_values(&[mode, outcome])
            .inc();
    }

    /// Count a job as in flight until the returned guard is dropped.
    #[must_use = "the job stops counting as in flight when the guard is dropped"]
    pub fn job_in_flight(&self) -> InFlightGuard {
        self.inner.jobs_in_flight.inc();
        InFlightGuard {
            gauge: self.inner.jobs_in_flight.clone(),
        }
    }

    /// Add `count` swept artifacts for the given class directory.
    pub fn add_swept(&self, class: &str, count: u64) {
        self.inner
            .artifacts_swept_total
            .with_label_values(&[class])
            .inc_by(count);
    }

    /// Increment the sweep failure counter.
    pub fn inc_sweep_failure(&self) {
        self.inner.sweep_failures_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the gathered families cannot be encoded.
    pub fn render(&self) -> Result<String> {
        TextEncoder::new()
            .encode_to_string(&self.inner.registry.gather())
            .map_err(|source| TelemetryError::Render { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            jobs_in_flight: self.inner.jobs_in_flight.get(),
            jobs_succeeded_total: self.jobs_with_outcome(JobOutcomeLabel::Succeeded),
            jobs_failed_total: self.jobs_with_outcome(JobOutcomeLabel::Failed),
            sweep_failures_total: self.inner.sweep_failures_total.get(),
        }
    }

    fn jobs_with_outcome(&self, outcome: JobOutcomeLabel) -> u64 {
        JOB_KIND_LABELS
            .iter()
            .map(|kind| {
                self.inner
                    .jobs_total
                    .with_label_values(&[*kind, outcome.as_str()])
                    .get()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/upload", 200);
        metrics.inc_job("compress", JobOutcomeLabel::Succeeded);
        metrics.inc_job("extract", JobOutcomeLabel::Succeeded);
        metrics.inc_job("compress", JobOutcomeLabel::Failed);
        metrics.inc_codec_invocation("encode", "timeout");
        let _running = metrics.job_in_flight();
        drop(metrics.job_in_flight());
        metrics.add_swept("incoming", 3);
        metrics.inc_sweep_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.jobs_in_flight, 1);
        assert_eq!(snapshot.jobs_succeeded_total, 2);
        assert_eq!(snapshot.jobs_failed_total, 1);
        assert_eq!(snapshot.sweep_failures_total, 1);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("codec_invocations_total"));
        assert!(rendered.contains(r#"artifacts_swept_total{class="incoming"} 3"#));
        Ok(())
    }

    #[test]
    fn snapshot_serializes_for_health_payloads() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let metrics = Metrics::new()?;
        let value = serde_json::to_value(metrics.snapshot())?;
        assert_eq!(value["jobs_in_flight"], 0);
        assert_eq!(value["jobs_failed_total"], 0);
        Ok(())
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(JobOutcomeLabel::Succeeded.as_str(), "succeeded");
        assert_eq!(JobOutcomeLabel::Failed.as_str(), "failed");
    }
}
