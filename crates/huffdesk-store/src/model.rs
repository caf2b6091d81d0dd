//! Artifact descriptors and retention settings.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::naming::ArtifactId;

/// Directory class owning an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactClass {
    /// Uploaded originals.
    Incoming,
    /// Archives produced by compress jobs.
    Produced,
    /// File sets written by extract jobs.
    Extracted,
}

impl ArtifactClass {
    /// Every class, in sweep order.
    pub const ALL: [Self; 3] = [Self::Incoming, Self::Produced, Self::Extracted];

    /// Directory name under the data root; also the first segment of references.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Produced => "produced",
            Self::Extracted => "extracted",
        }
    }

    /// Class for a directory name, if it is one of ours.
    #[must_use]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.dir_name() == name)
    }
}

/// A file owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Owning directory class.
    pub class: ArtifactClass,
    /// Absolute or root-relative storage path.
    pub path: PathBuf,
    /// Name presented to users.
    pub logical_name: String,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// `/`-separated reference relative to the data root, accepted by `ArtifactStore::resolve`.
    pub reference: String,
}

/// An upload written to the incoming directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// Id namespacing this upload and everything derived from it.
    pub id: ArtifactId,
    /// `<id>-<logical name>` file name inside `incoming/`.
    pub stored_name: String,
    /// Filesystem view of the staged file.
    pub artifact: Artifact,
}

/// Process-wide retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    /// Entries older than this are removed.
    pub max_age: Duration,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(60 * 60),
        }
    }
}

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries removed from `incoming/`.
    pub incoming: u64,
    /// Entries removed from `produced/`.
    pub produced: u64,
    /// Entries removed from `extracted/`.
    pub extracted: u64,
    /// Entries that could not be inspected or removed.
    pub failures: u64,
}

impl SweepReport {
    /// Removals recorded for one class.
    #[must_use]
    pub const fn removed(&self, class: ArtifactClass) -> u64 {
        match class {
            ArtifactClass::Incoming => self.incoming,
            ArtifactClass::Produced => self.produced,
            ArtifactClass::Extracted => self.extracted,
        }
    }

    /// Removals across all classes.
    #[must_use]
    pub const fn total_removed(&self) -> u64 {
        self.incoming + self.produced + self.extracted
    }

    pub(crate) const fn record_removal(&mut self, class: ArtifactClass) {
        match class {
            ArtifactClass::Incoming => self.incoming += 1,
            ArtifactClass::Produced => self.produced += 1,
            ArtifactClass::Extracted => self.extracted += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_round_trip() {
        for class in ArtifactClass::ALL {
            assert_eq!(ArtifactClass::from_dir_name(class.dir_name()), Some(class));
        }
        assert_eq!(ArtifactClass::from_dir_name("static"), None);
    }

    #[test]
    fn default_policy_retains_one_hour() {
        assert_eq!(SweepPolicy::default().max_age, Duration::from_secs(3600));
    }

    #[test]
    fn sweep_report_totals() {
        let mut report = SweepReport::default();
        report.record_removal(ArtifactClass::Incoming);
        report.record_removal(ArtifactClass::Extracted);
        report.record_removal(ArtifactClass::Extracted);
        assert_eq!(report.removed(ArtifactClass::Extracted), 2);
        assert_eq!(report.removed(ArtifactClass::Produced), 0);
        assert_eq!(report.total_removed(), 3);
    }
}
