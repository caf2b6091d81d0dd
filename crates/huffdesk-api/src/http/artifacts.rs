//! Artifact retrieval and housekeeping endpoints.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::Response,
};
use huffdesk_jobs::{JobFailure, sweep_artifacts};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use crate::http::errors::ApiError;
use crate::models::CleanupResponse;
use crate::state::ApiState;

/// `GET /download/{*reference}`: stream an artifact back as an attachment.
pub(crate) async fn download(
    State(state): State<Arc<ApiState>>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let artifact = state.store().resolve(&reference).await.map_err(|err| {
        warn!(error = %err, reference = %reference, "artifact lookup failed");
        ApiError::from_failure(JobFailure::from_store(&err))
    })?;
    let file = state
        .store()
        .open(&artifact)
        .await
        .map_err(|err| ApiError::from_failure(JobFailure::from_store(&err)))?;

    info!(
        reference = %artifact.reference,
        bytes = artifact.size,
        "serving artifact"
    );
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, artifact.size)
        .header(CONTENT_DISPOSITION, attachment_header(&artifact.logical_name))
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|err| {
            error!(error = %err, "failed to build download response");
            ApiError::internal("failed to build download response")
        })
}

/// `DELETE /cleanup`: sweep every artifact class with the configured retention.
pub(crate) async fn cleanup(State(state): State<Arc<ApiState>>) -> Json<CleanupResponse> {
    let report = sweep_artifacts(state.store(), &state.telemetry, state.sweep_policy).await;
    Json(CleanupResponse::from(report))
}

fn attachment_header(name: &str) -> HeaderValue {
    let fallback: String = name
        .chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| match ch {
            '"' | '\\' => '_',
            ch if ch.is_ascii() => ch,
            _ => '_',
        })
        .collect();
    let mut value = format!("attachment; filename=\"{fallback}\"");
    if !name.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        value.push_str(&percent_encode(name));
    }
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_names_are_quoted() {
        assert_eq!(
            attachment_header("notes.txt.huf"),
            "attachment; filename=\"notes.txt.huf\""
        );
        assert_eq!(
            attachment_header("say \"hi\".txt"),
            "attachment; filename=\"say _hi_.txt\""
        );
        assert_eq!(attachment_header("tab\there"), "attachment; filename=\"tabhere\"");
    }

    #[test]
    fn non_ascii_names_carry_an_encoded_variant() {
        assert_eq!(
            attachment_header("résumé.pdf"),
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }
}
