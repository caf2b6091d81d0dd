//! Artifact identifiers and storage-safe names.
//!
//! # Design
//! - An id is a strictly increasing millisecond stamp plus a random UUID; the stamp keeps
//!   listings chronological and the UUID rules out collisions across processes.
//! - Stored names are `<id>-<sanitised logical name>`; the logical name can be recovered
//!   from a stored name for download headers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

const FALLBACK_NAME: &str = "upload";
const NONCE_LEN: usize = 32;

/// Unique identifier namespacing every staged artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    stamp_ms: u64,
    nonce: Uuid,
}

impl ArtifactId {
    /// Creation stamp in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn stamp_ms(&self) -> u64 {
        self.stamp_ms
    }

    /// Split a stored name into its id and logical name.
    #[must_use]
    pub fn split_stored_name(stored: &str) -> Option<(Self, &str)> {
        let (stamp, rest) = stored.split_once('-')?;
        if stamp.is_empty() || !stamp.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        let stamp_ms = stamp.parse::<u64>().ok()?;
        let nonce = rest.get(..NONCE_LEN)?;
        let logical = rest.get(NONCE_LEN..)?.strip_prefix('-')?;
        let nonce = Uuid::try_parse(nonce).ok()?;
        if logical.is_empty() {
            return None;
        }
        Some((Self { stamp_ms, nonce }, logical))
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stamp_ms, self.nonce.simple())
    }
}

/// Issues artifact ids whose stamps never repeat or go backwards within a process.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    last_ms: AtomicU64,
}

impl IdGenerator {
    pub(crate) fn next_id(&self) -> ArtifactId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut previous = self.last_ms.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last_ms.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return ArtifactId {
                        stamp_ms: candidate,
                        nonce: Uuid::new_v4(),
                    };
                }
                Err(actual) => previous = actual,
            }
        }
    }
}

/// Reduce a user-supplied filename to a single safe path component.
#[must_use]
pub fn sanitize_logical_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned = sanitize_filename::sanitize(last);
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Stored name for a logical name under the given id.
#[must_use]
pub fn stored_name(id: &ArtifactId, logical: &str) -> String {
    format!("{id}-{logical}")
}

/// Logical name to present for a stored file name.
#[must_use]
pub fn logical_name(stored: &str) -> &str {
    ArtifactId::split_stored_name(stored).map_or(stored, |(_, logical)| logical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids = IdGenerator::default();
        let mut previous = ids.next_id().stamp_ms();
        for _ in 0..1_000 {
            let next = ids.next_id().stamp_ms();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn ids_from_parallel_threads_are_unique() -> Result<(), Box<dyn std::error::Error>> {
        let ids = Arc::new(IdGenerator::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || {
                    (0..250).map(|_| ids.next_id().stamp_ms()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            let stamps = handle.join().map_err(|_| "worker panicked")?;
            for stamp in stamps {
                assert!(seen.insert(stamp), "duplicate stamp {stamp}");
            }
        }
        assert_eq!(seen.len(), 2_000);
        Ok(())
    }

    #[test]
    fn stored_names_round_trip_to_logical_names() {
        let id = IdGenerator::default().next_id();
        let stored = stored_name(&id, "my notes.txt");
        let (parsed, logical) = ArtifactId::split_stored_name(&stored).unwrap_or_else(|| {
            panic!("stored name {stored} did not parse");
        });
        assert_eq!(parsed, id);
        assert_eq!(logical, "my notes.txt");
        assert_eq!(logical_name(&format!("{stored}.huf")), "my notes.txt.huf");
    }

    #[test]
    fn foreign_names_are_presented_verbatim() {
        assert_eq!(logical_name("report.txt"), "report.txt");
        assert_eq!(logical_name("1700-report.txt"), "1700-report.txt");
        assert!(ArtifactId::split_stored_name("-abc").is_none());
    }

    #[test]
    fn sanitizing_keeps_one_component() {
        assert_eq!(sanitize_logical_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_logical_name("C:\\Users\\me\\file.txt"), "file.txt");
        assert_eq!(sanitize_logical_name("a\u{0}b.txt"), "ab.txt");
        assert_eq!(sanitize_logical_name(""), "upload");
        assert_eq!(sanitize_logical_name(".."), "upload");
        assert_eq!(sanitize_logical_name("dir/"), "upload");
        assert_eq!(sanitize_logical_name("report; rm -rf.txt"), "report; rm -rf.txt");
    }
}
