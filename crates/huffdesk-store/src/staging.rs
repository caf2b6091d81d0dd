//! Size-capped writer for uploads landing in `incoming/`.
//!
//! # Design
//! - The running byte count is checked before every chunk is written, so an oversized
//!   upload never occupies more than the limit on disk.
//! - Crossing the limit deletes the partial file immediately; the writer is unusable afterwards.
//! - A writer dropped without `finish` or `abort` leaves its partial file for the sweep.

use std::path::PathBuf;

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::{ArtifactClass, StagedArtifact};
use crate::naming::ArtifactId;
use crate::store::describe_path;

/// Streaming writer for one staged upload.
#[derive(Debug)]
pub struct StagingWriter {
    id: ArtifactId,
    stored_name: String,
    logical_name: String,
    reference: String,
    path: PathBuf,
    file: Option<BufWriter<File>>,
    written: u64,
    limit: u64,
}

impl StagingWriter {
    pub(crate) fn new(
        id: ArtifactId,
        stored_name: String,
        logical_name: String,
        path: PathBuf,
        file: File,
        limit: u64,
    ) -> Self {
        let reference = format!("{}/{stored_name}", ArtifactClass::Incoming.dir_name());
        Self {
            id,
            stored_name,
            logical_name,
            reference,
            path,
            file: Some(BufWriter::new(file)),
            written: 0,
            limit,
        }
    }

    /// Id assigned to this upload.
    #[must_use]
    pub const fn id(&self) -> ArtifactId {
        self.id
    }

    /// Bytes accepted so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Append a chunk of the upload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PayloadTooLarge`] once the running size would exceed the limit;
    /// the partial file has been deleted by then. IO failures surface as [`StoreError::Io`].
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StoreResult<()> {
        let chunk_len = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        let received = self.written.saturating_add(chunk_len);
        if received > self.limit {
            self.discard().await;
            return Err(StoreError::PayloadTooLarge {
                limit: self.limit,
                received,
            });
        }
        let Some(file) = self.file.as_mut() else {
            return Err(StoreError::PathNotFound {
                path: self.path.clone(),
            });
        };
        file.write_all(chunk)
            .await
            .map_err(|source| StoreError::io("write_chunk", &self.path, source))?;
        self.written = received;
        Ok(())
    }

    /// Flush the upload and describe the staged artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when flushing fails or the writer was already discarded.
    pub async fn finish(mut self) -> StoreResult<StagedArtifact> {
        let Some(mut file) = self.file.take() else {
            return Err(StoreError::PathNotFound { path: self.path });
        };
        if let Err(source) = file.flush().await {
            drop(file);
            remove_partial(&self.path).await;
            return Err(StoreError::io("flush_upload", &self.path, source));
        }
        drop(file);

        let mut artifact = describe_path(ArtifactClass::Incoming, &self.path, self.reference).await?;
        artifact.logical_name = self.logical_name;
        debug!(
            artifact_id = %self.id,
            bytes = artifact.size,
            path = %self.path.display(),
            "upload staged"
        );
        Ok(StagedArtifact {
            id: self.id,
            stored_name: self.stored_name,
            artifact,
        })
    }

    /// Abandon the upload and delete the partial file.
    pub async fn abort(mut self) {
        self.discard().await;
    }

    async fn discard(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            remove_partial(&self.path).await;
        }
    }
}

async fn remove_partial(path: &std::path::Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "partial upload removed"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            error = %err,
            path = %path.display(),
            "failed to remove partial upload"
        ),
    }
}
