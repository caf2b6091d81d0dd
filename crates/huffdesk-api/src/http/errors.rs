//! RFC9457-style API error wrapper.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use huffdesk_jobs::{FailureKind, JobFailure};

use crate::http::constants::{
    PROBLEM_ARTIFACT_WRITE, PROBLEM_BAD_REQUEST, PROBLEM_CODEC_FAILED, PROBLEM_CODEC_TIMEOUT,
    PROBLEM_INTERNAL, PROBLEM_NOT_FOUND, PROBLEM_PAYLOAD_TOO_LARGE,
};
use crate::models::ProblemDetails;

/// Structured API error rendered as a problem document.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    problem: &'static str,
    title: &'static str,
    kind: Option<FailureKind>,
    detail: Option<String>,
    output: Option<String>,
    job_id: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, problem: &'static str, title: &'static str) -> Self {
        Self {
            status,
            problem,
            title,
            kind: None,
            detail: None,
            output: None,
            job_id: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    /// Map a job failure onto its HTTP status, keeping the kind and captured output.
    pub(crate) fn from_failure(failure: JobFailure) -> Self {
        let (status, problem, title) = match failure.kind {
            FailureKind::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                PROBLEM_PAYLOAD_TOO_LARGE,
                "payload too large",
            ),
            FailureKind::UnrecognizedOperation => (
                StatusCode::BAD_REQUEST,
                PROBLEM_BAD_REQUEST,
                "unrecognized operation",
            ),
            FailureKind::CodecTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                PROBLEM_CODEC_TIMEOUT,
                "codec timed out",
            ),
            FailureKind::CodecExecutionFailed => (
                StatusCode::BAD_GATEWAY,
                PROBLEM_CODEC_FAILED,
                "codec execution failed",
            ),
            FailureKind::PathNotFound => (
                StatusCode::NOT_FOUND,
                PROBLEM_NOT_FOUND,
                "resource not found",
            ),
            FailureKind::ArtifactWriteFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PROBLEM_ARTIFACT_WRITE,
                "artifact write failed",
            ),
            FailureKind::InternalAssemblyError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PROBLEM_INTERNAL,
                "internal server error",
            ),
        };
        Self {
            kind: Some(failure.kind),
            output: failure.output,
            job_id: failure.job_id.map(|id| id.to_string()),
            ..Self::new(status, problem, title).with_detail(failure.message)
        }
    }

    /// Classify a malformed multipart body; an over-limit body is a payload failure.
    pub(crate) fn from_multipart(err: &MultipartError) -> Self {
        let kind = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            FailureKind::PayloadTooLarge
        } else {
            FailureKind::UnrecognizedOperation
        };
        Self::from_failure(JobFailure::new(kind, err.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            problem_type: self.problem.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            kind: self.kind.map(|kind| kind.as_str().to_string()),
            output: self.output,
            job_id: self.job_id,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_map_to_statuses() {
        let cases = [
            (FailureKind::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (FailureKind::UnrecognizedOperation, StatusCode::BAD_REQUEST),
            (FailureKind::CodecTimeout, StatusCode::GATEWAY_TIMEOUT),
            (FailureKind::CodecExecutionFailed, StatusCode::BAD_GATEWAY),
            (FailureKind::PathNotFound, StatusCode::NOT_FOUND),
            (
                FailureKind::ArtifactWriteFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                FailureKind::InternalAssemblyError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (kind, status) in cases {
            let error = ApiError::from_failure(JobFailure::new(kind, "boom"));
            assert_eq!(error.status, status, "{}", kind.as_str());
            assert_eq!(error.kind, Some(kind));
            assert_eq!(error.detail.as_deref(), Some("boom"));
        }
    }

    #[test]
    fn captured_output_is_carried_through() {
        let failure = JobFailure::new(FailureKind::CodecExecutionFailed, "exit 1")
            .with_output(Some("Error: bad header".to_string()));
        let error = ApiError::from_failure(failure);
        assert_eq!(error.output.as_deref(), Some("Error: bad header"));
        assert!(error.job_id.is_none());
    }

    #[test]
    fn internal_errors_have_no_failure_kind() {
        let error = ApiError::internal("render failed");
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.kind.is_none());
    }
}
