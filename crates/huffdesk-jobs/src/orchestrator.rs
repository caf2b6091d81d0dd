//! `JobOrchestrator`: drives one upload from staging to an assembled report.
//!
//! # Design
//! - The codec's stdout always goes through the parser on success; statistics are never
//!   inferred from anything else.
//! - Sizes come from the filesystem; the parsed report is returned as decoded.
//! - Every error leaving this module is a [`JobFailure`].

use std::sync::Arc;

use huffdesk_codec::{CodecRequest, CodecRunner};
use huffdesk_report::parse;
use huffdesk_store::{ArtifactClass, ArtifactStore, StagedArtifact, StoreError};
use huffdesk_telemetry::{JobOutcomeLabel, Metrics};
use tokio::io::AsyncRead;
use tracing::{info, warn};

use crate::failure::{FailureKind, JobFailure};
use crate::model::{
    ArchiveReport, CompressedReport, Job, JobKind, JobReport, JobState, classify,
};

/// Runs jobs against one artifact store and codec runner.
#[derive(Clone)]
pub struct JobOrchestrator {
    store: ArtifactStore,
    runner: Arc<dyn CodecRunner>,
    metrics: Metrics,
}

impl JobOrchestrator {
    /// Build an orchestrator.
    #[must_use]
    pub fn new(store: ArtifactStore, runner: Arc<dyn CodecRunner>, metrics: Metrics) -> Self {
        Self {
            store,
            runner,
            metrics,
        }
    }

    /// Store the orchestrator writes into.
    #[must_use]
    pub const fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Stage `reader` under `display_name` and run the resulting job.
    ///
    /// # Errors
    ///
    /// Returns a [`JobFailure`] classifying whatever stopped the job.
    pub async fn submit<R>(&self, reader: R, display_name: &str) -> Result<JobReport, JobFailure>
    where
        R: AsyncRead + Unpin + Send,
    {
        let staged = self
            .store
            .stage(reader, display_name)
            .await
            .map_err(|err| self.staging_failed(display_name, &err))?;
        self.process(display_name, staged).await
    }

    /// Record an upload that never reached the incoming directory and classify the cause.
    ///
    /// Callers staging through [`ArtifactStore::begin_stage`] report their write errors here
    /// so they are counted like any other failed job.
    #[must_use]
    pub fn staging_failed(&self, display_name: &str, err: &StoreError) -> JobFailure {
        let failure = JobFailure::from_store(err);
        self.metrics
            .inc_job(classify(display_name).as_str(), JobOutcomeLabel::Failed);
        warn!(error = %err, kind = failure.kind.as_str(), "upload staging failed");
        failure
    }

    /// Run the job for an upload that is already staged.
    ///
    /// # Errors
    ///
    /// Returns a [`JobFailure`] classifying whatever stopped the job.
    pub async fn process(
        &self,
        display_name: &str,
        staged: StagedArtifact,
    ) -> Result<JobReport, JobFailure> {
        let mut job = Job::staged(display_name, staged);
        let job_id = job.id;
        let kind = job.kind;

        let in_flight = self.metrics.job_in_flight();
        let result = self.drive(&mut job).await;
        drop(in_flight);

        match result {
            Ok(report) => {
                self.metrics.inc_job(kind.as_str(), JobOutcomeLabel::Succeeded);
                info!(job_id = %job_id, kind = kind.as_str(), "job assembled");
                Ok(report)
            }
            Err(failure) => {
                job.advance(JobState::Failed);
                self.metrics.inc_job(kind.as_str(), JobOutcomeLabel::Failed);
                warn!(
                    job_id = %job_id,
                    kind = kind.as_str(),
                    failure = failure.kind.as_str(),
                    message = %failure.message,
                    "job failed"
                );
                Err(failure.for_job(job_id))
            }
        }
    }

    async fn drive(&self, job: &mut Job) -> Result<JobReport, JobFailure> {
        let output_target = match job.kind {
            JobKind::Compress => self.store.produced_path(&job.source),
            JobKind::Extract => self
                .store
                .extraction_dir(&job.source)
                .await
                .map_err(|err| JobFailure::from_store(&err))?,
        };
        let request = CodecRequest {
            mode: job.kind.codec_mode(),
            input: job.source.artifact.path.clone(),
            output: output_target,
        };

        job.advance(JobState::Invoking);
        let mode = request.mode.as_str();
        let output = match self.runner.run(&request).await {
            Ok(output) => {
                self.metrics.inc_codec_invocation(mode, "ok");
                output
            }
            Err(err) => {
                self.metrics.inc_codec_invocation(mode, err.label());
                return Err(JobFailure::from_codec(&err));
            }
        };

        job.advance(JobState::ParsingOutput);
        let stats = parse(&output.stdout);
        if stats.is_empty() {
            warn!(
                job_id = %job.id,
                mode,
                stdout_bytes = output.stdout.len(),
                "codec succeeded but its output carried no statistics"
            );
        }

        match job.kind {
            JobKind::Compress => {
                let produced = self
                    .store
                    .describe(ArtifactClass::Produced, &request.output)
                    .await
                    .map_err(|err| {
                        assembly_failure(&err, "produced archive is missing")
                            .with_output(Some(output.stdout.clone()))
                    })?;
                job.advance(JobState::Assembled);
                Ok(JobReport::Compressed(CompressedReport {
                    job: job.clone(),
                    produced,
                    stats,
                    output: output.stdout,
                }))
            }
            JobKind::Extract => {
                let files = self
                    .store
                    .list_extracted(&request.output)
                    .await
                    .map_err(|err| listing_failure(&err).with_output(Some(output.stdout.clone())))?;
                let directory_reference = self
                    .store
                    .reference_for(&request.output)
                    .unwrap_or_else(|| request.output.to_string_lossy().into_owned());
                job.advance(JobState::Assembled);
                Ok(JobReport::Archive(ArchiveReport {
                    job: job.clone(),
                    directory: request.output,
                    directory_reference,
                    files,
                    stats,
                    output: output.stdout,
                }))
            }
        }
    }
}

fn assembly_failure(err: &StoreError, missing: &str) -> JobFailure {
    match err {
        StoreError::PathNotFound { .. } => {
            JobFailure::new(FailureKind::InternalAssemblyError, missing)
        }
        other => JobFailure::new(
            FailureKind::InternalAssemblyError,
            format!("failed to inspect codec output: {other}"),
        ),
    }
}

fn listing_failure(err: &StoreError) -> JobFailure {
    match err {
        StoreError::PathNotFound { .. } => JobFailure::from_store(err),
        _ => assembly_failure(err, "extraction directory is missing"),
    }
}
