//! `POST /upload`: stream the file part to disk, then run the job.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};
use huffdesk_jobs::{FailureKind, JobFailure};
use huffdesk_store::StagedArtifact;
use tracing::{debug, info};

use crate::http::constants::{FALLBACK_UPLOAD_NAME, UPLOAD_FIELD};
use crate::http::errors::ApiError;
use crate::models::UploadResponse;
use crate::state::ApiState;

pub(crate) async fn upload(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::from_multipart(&err))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = field.name().unwrap_or_default(), "skipping multipart field");
            continue;
        }
        let display_name = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_UPLOAD_NAME)
            .to_string();
        let staged = stage_field(&state, &display_name, &mut field).await?;
        info!(
            artifact_id = %staged.id,
            bytes = staged.artifact.size,
            name = %display_name,
            "upload received"
        );
        let report = state
            .orchestrator
            .process(&display_name, staged)
            .await
            .map_err(ApiError::from_failure)?;
        return Ok(Json(UploadResponse::from(&report)));
    }

    Err(ApiError::from_failure(JobFailure::new(
        FailureKind::UnrecognizedOperation,
        "multipart field `file` is missing",
    )))
}

async fn stage_field(
    state: &ApiState,
    display_name: &str,
    field: &mut Field<'_>,
) -> Result<StagedArtifact, ApiError> {
    let orchestrator = &state.orchestrator;
    let mut writer = orchestrator
        .store()
        .begin_stage(display_name)
        .await
        .map_err(|err| ApiError::from_failure(orchestrator.staging_failed(display_name, &err)))?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(err) => {
                writer.abort().await;
                return Err(ApiError::from_multipart(&err));
            }
        };
        if let Err(err) = writer.write_chunk(&chunk).await {
            writer.abort().await;
            return Err(ApiError::from_failure(
                orchestrator.staging_failed(display_name, &err),
            ));
        }
    }

    writer
        .finish()
        .await
        .map_err(|err| ApiError::from_failure(orchestrator.staging_failed(display_name, &err)))
}
