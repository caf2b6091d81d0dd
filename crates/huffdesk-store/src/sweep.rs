//! Age-based reclamation across the artifact directories.
//!
//! # Design
//! - Only top-level entries of each class directory are considered; an extraction
//!   directory is removed as a whole.
//! - Entries that disappear between listing and removal count as already swept.
//! - Other failures are logged and counted; they never abort the pass.

use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::model::{ArtifactClass, SweepPolicy, SweepReport};
use crate::store::ArtifactStore;

impl ArtifactStore {
    /// Remove every entry whose modification time is older than `now - max_age`.
    pub async fn sweep(&self, now: SystemTime, max_age: Duration) -> SweepReport {
        let mut report = SweepReport::default();
        let Some(cutoff) = now.checked_sub(max_age) else {
            return report;
        };
        for class in ArtifactClass::ALL {
            sweep_class(&self.class_dir(class), class, cutoff, &mut report).await;
        }
        info!(
            incoming = report.incoming,
            produced = report.produced,
            extracted = report.extracted,
            failures = report.failures,
            "artifact sweep completed"
        );
        report
    }

    /// Sweep with the given policy relative to the current time.
    pub async fn sweep_now(&self, policy: SweepPolicy) -> SweepReport {
        self.sweep(SystemTime::now(), policy.max_age).await
    }
}

async fn sweep_class(dir: &Path, class: ArtifactClass, cutoff: SystemTime, report: &mut SweepReport) {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return,
        Err(err) => {
            warn!(error = %err, path = %dir.display(), "failed to read artifact directory");
            report.failures += 1;
            return;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, path = %dir.display(), "failed to traverse artifact directory");
                report.failures += 1;
                break;
            }
        };
        let path = entry.path();
        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => {
                warn!(error = %err, path = %path.display(), "failed to inspect artifact");
                report.failures += 1;
                continue;
            }
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if modified >= cutoff {
            continue;
        }

        let removal = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        match removal {
            Ok(()) => {
                debug!(class = class.dir_name(), path = %path.display(), "artifact swept");
                report.record_removal(class);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(error = %err, path = %path.display(), "failed to remove artifact");
                report.failures += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::error::Error;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn Error>>;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn backdate(path: &Path, now: SystemTime, age: Duration) -> TestResult {
        let stamp = FileTime::from_system_time(now.checked_sub(age).ok_or("time underflow")?);
        filetime::set_file_mtime(path, stamp)?;
        Ok(())
    }

    #[tokio::test]
    async fn removes_only_entries_older_than_max_age() -> TestResult {
        let temp = TempDir::new()?;
        let store = ArtifactStore::new(temp.path(), 1024);
        store.ensure_layout().await?;
        let now = SystemTime::now();

        let stale = store.class_dir(ArtifactClass::Incoming).join("stale.txt");
        let fresh = store.class_dir(ArtifactClass::Incoming).join("fresh.txt");
        std::fs::write(&stale, b"old")?;
        std::fs::write(&fresh, b"new")?;
        backdate(&stale, now, 2 * HOUR)?;
        backdate(&fresh, now, Duration::from_secs(10 * 60))?;

        let report = store.sweep(now, HOUR).await;
        assert!(!stale.exists());
        assert!(fresh.exists());
        assert_eq!(report.incoming, 1);
        assert_eq!(report.total_removed(), 1);
        assert_eq!(report.failures, 0);
        Ok(())
    }

    #[tokio::test]
    async fn sweeps_every_class_including_extraction_dirs() -> TestResult {
        let temp = TempDir::new()?;
        let store = ArtifactStore::new(temp.path(), 1024);
        store.ensure_layout().await?;
        let now = SystemTime::now();

        let produced = store.class_dir(ArtifactClass::Produced).join("a.huf");
        std::fs::write(&produced, b"huff")?;
        backdate(&produced, now, 3 * HOUR)?;

        let extracted = store.class_dir(ArtifactClass::Extracted).join("job");
        std::fs::create_dir_all(&extracted)?;
        std::fs::write(extracted.join("member.txt"), b"member")?;
        backdate(&extracted, now, 3 * HOUR)?;

        let report = store.sweep(now, HOUR).await;
        assert_eq!(report.produced, 1);
        assert_eq!(report.extracted, 1);
        assert!(!produced.exists());
        assert!(!extracted.exists());
        assert!(store.class_dir(ArtifactClass::Extracted).is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn missing_directories_are_benign() -> TestResult {
        let temp = TempDir::new()?;
        let store = ArtifactStore::new(temp.path().join("never-created"), 1024);
        let report = store.sweep(SystemTime::now(), HOUR).await;
        assert_eq!(report, SweepReport::default());
        Ok(())
    }

    #[tokio::test]
    async fn oversized_max_age_removes_nothing() -> TestResult {
        let temp = TempDir::new()?;
        let store = ArtifactStore::new(temp.path(), 1024);
        store.ensure_layout().await?;
        std::fs::write(store.class_dir(ArtifactClass::Incoming).join("x"), b"x")?;
        let report = store.sweep(SystemTime::UNIX_EPOCH, HOUR).await;
        assert_eq!(report.total_removed(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn sweep_now_uses_policy_age() -> TestResult {
        let temp = TempDir::new()?;
        let store = ArtifactStore::new(temp.path(), 1024);
        store.ensure_layout().await?;
        let stale = store.class_dir(ArtifactClass::Produced).join("old.huf");
        std::fs::write(&stale, b"x")?;
        backdate(&stale, SystemTime::now(), 2 * HOUR)?;

        let report = store.sweep_now(SweepPolicy::default()).await;
        assert_eq!(report.produced, 1);
        Ok(())
    }
}
