//! `ArtifactStore`: directory layout, staging entry points, listings and reference resolution.
//!
//! # Design
//! - All paths derive from a staged artifact's stored name, so outputs of one job can never
//!   land on another job's paths.
//! - References are `/`-separated, relative to the data root, and must start with a class
//!   directory; anything else is rejected before touching the filesystem.

use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::{Artifact, ArtifactClass, StagedArtifact};
use crate::naming::{IdGenerator, logical_name, sanitize_logical_name, stored_name};
use crate::staging::StagingWriter;

/// File suffix of codec archives.
pub const ARCHIVE_SUFFIX: &str = ".huf";

const STAGE_BUFFER_BYTES: usize = 64 * 1024;

/// Owner of the `incoming`, `produced` and `extracted` directories under one data root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    root: PathBuf,
    max_upload_bytes: u64,
    ids: IdGenerator,
}

impl ArtifactStore {
    /// Create a store rooted at `root`, rejecting uploads larger than `max_upload_bytes`.
    ///
    /// A relative `root` is resolved against the current directory here, so every path
    /// handed to the codec stays valid whatever directory the codec runs in.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_upload_bytes: u64) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            inner: Arc::new(StoreInner {
                root,
                max_upload_bytes,
                ids: IdGenerator::default(),
            }),
        }
    }

    /// Data root holding the class directories.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Configured upload ceiling in bytes.
    #[must_use]
    pub fn max_upload_bytes(&self) -> u64 {
        self.inner.max_upload_bytes
    }

    /// Directory for one artifact class.
    #[must_use]
    pub fn class_dir(&self, class: ArtifactClass) -> PathBuf {
        self.inner.root.join(class.dir_name())
    }

    /// Create any missing class directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when a directory cannot be created.
    pub async fn ensure_layout(&self) -> StoreResult<()> {
        for class in ArtifactClass::ALL {
            let dir = self.class_dir(class);
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| StoreError::io("create_class_dir", &dir, source))?;
        }
        Ok(())
    }

    /// Open a new upload in `incoming/` under a fresh artifact id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the incoming file cannot be created.
    pub async fn begin_stage(&self, original_name: &str) -> StoreResult<StagingWriter> {
        let id = self.inner.ids.next_id();
        let logical = sanitize_logical_name(original_name);
        let stored = stored_name(&id, &logical);
        let dir = self.class_dir(ArtifactClass::Incoming);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::io("create_class_dir", &dir, source))?;
        let path = dir.join(&stored);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| StoreError::io("create_upload", &path, source))?;
        debug!(artifact_id = %id, path = %path.display(), "staging upload");
        Ok(StagingWriter::new(
            id,
            stored,
            logical,
            path,
            file,
            self.inner.max_upload_bytes,
        ))
    }

    /// Stream `reader` into `incoming/` as one staged upload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PayloadTooLarge`] when the stream exceeds the limit and
    /// [`StoreError::Io`] on read or write failures. No partial file survives an error.
    pub async fn stage<R>(&self, mut reader: R, original_name: &str) -> StoreResult<StagedArtifact>
    where
        R: AsyncRead + Unpin,
    {
        let mut writer = self.begin_stage(original_name).await?;
        let mut buffer = vec![0_u8; STAGE_BUFFER_BYTES];
        loop {
            let read = match reader.read(&mut buffer).await {
                Ok(0) => break,
                Ok(read) => read,
                Err(source) => {
                    let path = self.class_dir(ArtifactClass::Incoming);
                    writer.abort().await;
                    return Err(StoreError::io("read_upload", path, source));
                }
            };
            writer.write_chunk(&buffer[..read]).await?;
        }
        writer.finish().await
    }

    /// Output path for a compress job on `source`.
    #[must_use]
    pub fn produced_path(&self, source: &StagedArtifact) -> PathBuf {
        self.class_dir(ArtifactClass::Produced)
            .join(format!("{}{ARCHIVE_SUFFIX}", source.stored_name))
    }

    /// Create and return the destination directory for an extract job on `source`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be created, including when it
    /// already exists.
    pub async fn extraction_dir(&self, source: &StagedArtifact) -> StoreResult<PathBuf> {
        let parent = self.class_dir(ArtifactClass::Extracted);
        fs::create_dir_all(&parent)
            .await
            .map_err(|source| StoreError::io("create_class_dir", &parent, source))?;
        let dir = parent.join(&source.stored_name);
        fs::create_dir(&dir)
            .await
            .map_err(|source| StoreError::io("create_extraction_dir", &dir, source))?;
        Ok(dir)
    }

    /// List the files directly inside an extraction directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PathNotFound`] when `dir` does not exist.
    pub async fn list_extracted(&self, dir: &Path) -> StoreResult<Vec<Artifact>> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|source| StoreError::io("read_extraction_dir", dir, source))?;
        let mut artifacts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| StoreError::io("read_extraction_dir", dir, source))?
        {
            let path = entry.path();
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "extracted entry vanished during listing");
                    continue;
                }
                Err(source) => return Err(StoreError::io("stat_extracted", &path, source)),
            };
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let reference = self.reference_for(&path).unwrap_or_else(|| name.clone());
            artifacts.push(artifact_from_metadata(
                ArtifactClass::Extracted,
                path,
                name,
                reference,
                &metadata,
            ));
        }
        artifacts.sort_by(|left, right| left.logical_name.cmp(&right.logical_name));
        Ok(artifacts)
    }

    /// Describe a file of the given class by its storage path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PathNotFound`] when the file does not exist.
    pub async fn describe(&self, class: ArtifactClass, path: &Path) -> StoreResult<Artifact> {
        let reference = self
            .reference_for(path)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        describe_path(class, path, reference).await
    }

    /// Resolve a relative reference such as `produced/<name>.huf` to a stored file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidReference`] for traversal attempts, unknown classes or
    /// directories, and [`StoreError::PathNotFound`] when nothing exists at the reference.
    pub async fn resolve(&self, reference: &str) -> StoreResult<Artifact> {
        let (class, relative) = parse_reference(reference)?;
        let path = self.inner.root.join(&relative);
        let metadata = fs::metadata(&path)
            .await
            .map_err(|source| StoreError::io("stat_reference", &path, source))?;
        if !metadata.is_file() {
            return Err(StoreError::invalid_reference(reference, "not_a_file"));
        }
        let stored = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let normalized = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(artifact_from_metadata(
            class,
            path,
            logical_name(&stored).to_string(),
            normalized,
            &metadata,
        ))
    }

    /// Open a resolved artifact for reading.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PathNotFound`] when the file was removed after resolution.
    pub async fn open(&self, artifact: &Artifact) -> StoreResult<File> {
        File::open(&artifact.path)
            .await
            .map_err(|source| StoreError::io("open_artifact", &artifact.path, source))
    }

    /// `/`-separated reference for a path under the data root.
    #[must_use]
    pub fn reference_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.inner.root).ok()?;
        let segments = relative
            .components()
            .map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        if segments.is_empty() {
            return None;
        }
        Some(segments.join("/"))
    }
}

fn parse_reference(reference: &str) -> StoreResult<(ArtifactClass, PathBuf)> {
    let trimmed = reference.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::invalid_reference(reference, "empty"));
    }
    if trimmed.contains('\\') || trimmed.contains('\0') {
        return Err(StoreError::invalid_reference(reference, "invalid_character"));
    }

    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            _ => return Err(StoreError::invalid_reference(reference, "invalid_segment")),
        }
    }

    let mut components = relative.components();
    let class = components
        .next()
        .and_then(|first| ArtifactClass::from_dir_name(&first.as_os_str().to_string_lossy()))
        .ok_or_else(|| StoreError::invalid_reference(reference, "unknown_class"))?;
    if components.next().is_none() {
        return Err(StoreError::invalid_reference(reference, "missing_name"));
    }
    Ok((class, relative))
}

pub(crate) async fn describe_path(
    class: ArtifactClass,
    path: &Path,
    reference: String,
) -> StoreResult<Artifact> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|source| StoreError::io("stat_artifact", path, source))?;
    let stored = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(artifact_from_metadata(
        class,
        path.to_path_buf(),
        logical_name(&stored).to_string(),
        reference,
        &metadata,
    ))
}

fn artifact_from_metadata(
    class: ArtifactClass,
    path: PathBuf,
    logical_name: String,
    reference: String,
    metadata: &Metadata,
) -> Artifact {
    let modified = metadata
        .modified()
        .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);
    Artifact {
        class,
        path,
        logical_name,
        size: metadata.len(),
        modified,
        reference,
    }
}
