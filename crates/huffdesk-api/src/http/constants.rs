//! Shared HTTP constants (headers, problem URIs, form fields).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// Multipart field carrying the uploaded file.
pub(crate) const UPLOAD_FIELD: &str = "file";
/// Name used when the multipart part carries no filename.
pub(crate) const FALLBACK_UPLOAD_NAME: &str = "upload";

pub(crate) const PROBLEM_INTERNAL: &str = "https://huffdesk.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://huffdesk.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://huffdesk.dev/problems/not-found";
pub(crate) const PROBLEM_PAYLOAD_TOO_LARGE: &str =
    "https://huffdesk.dev/problems/payload-too-large";
pub(crate) const PROBLEM_CODEC_TIMEOUT: &str = "https://huffdesk.dev/problems/codec-timeout";
pub(crate) const PROBLEM_CODEC_FAILED: &str = "https://huffdesk.dev/problems/codec-failed";
pub(crate) const PROBLEM_ARTIFACT_WRITE: &str = "https://huffdesk.dev/problems/artifact-write";
