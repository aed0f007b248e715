//! File-backed snapshot cache.
//!
//! One JSON file per (owner, target, object). Entries are written
//! atomically so a concurrent reader sees either the old file or the new
//! one, never a partial write. Every failure to read an entry is a miss.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use perfwatch_types::{current_timestamp_ms, CounterSnapshot, SchemaVersion};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors writing a cache entry. Never fatal to a probe.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist cache file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// What is stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: SchemaVersion,
    pub target: String,
    pub object: String,
    pub snapshot: CounterSnapshot,
}

/// Snapshot cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct CounterCache {
    dir: PathBuf,
    owner: String,
}

impl CounterCache {
    /// Cache in `dir`, keyed for the current user.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_owner(dir, current_owner())
    }

    pub fn with_owner<P: AsRef<Path>>(dir: P, owner: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            owner: owner.into(),
        }
    }

    /// File holding the entry for `target` and `object`.
    pub fn path_for(&self, target: &str, object: &str) -> PathBuf {
        self.dir.join(cache_key(&self.owner, target, object))
    }

    /// The cached snapshot if one exists and is younger than `max_age`.
    pub fn load(&self, target: &str, object: &str, max_age: Duration) -> Option<CounterSnapshot> {
        self.load_at(target, object, max_age, current_timestamp_ms())
    }

    /// [`CounterCache::load`] against an explicit clock.
    pub fn load_at(
        &self,
        target: &str,
        object: &str,
        max_age: Duration,
        now_ms: u64,
    ) -> Option<CounterSnapshot> {
        let path = self.path_for(target, object);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        if !entry.version.is_compatible() || !entry.snapshot.version.is_compatible() {
            debug!(
                path = %path.display(),
                major = entry.version.major,
                "ignoring cache entry from another schema version"
            );
            return None;
        }

        if entry.target != target || entry.object != object {
            warn!(
                path = %path.display(),
                stored_target = %entry.target,
                stored_object = %entry.object,
                "cache entry belongs to another key"
            );
            return None;
        }

        let age_ms = entry.snapshot.age_ms(now_ms);
        if u128::from(age_ms) >= max_age.as_millis() {
            debug!(path = %path.display(), age_ms, "cache entry expired");
            return None;
        }

        debug!(path = %path.display(), age_ms, samples = entry.snapshot.len(), "cache hit");
        Some(entry.snapshot)
    }

    /// Store `snapshot` for `target` and `object`, replacing any previous
    /// entry.
    pub fn save(
        &self,
        target: &str,
        object: &str,
        snapshot: &CounterSnapshot,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let entry = CacheEntry {
            version: SchemaVersion::current(),
            target: target.to_string(),
            object: object.to_string(),
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_vec(&entry)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        let path = self.path_for(target, object);
        file.persist(&path)?;

        debug!(path = %path.display(), samples = snapshot.len(), "cache entry saved");
        Ok(())
    }
}

/// File name for an entry. Spaces and path separators become `_`.
pub fn cache_key(owner: &str, target: &str, object: &str) -> String {
    let raw = format!("perfwatch_{}_{}_{}", owner, target, object);
    let sanitized: String = raw
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();
    format!("{}.json", sanitized)
}

#[cfg(unix)]
fn current_owner() -> String {
    // SAFETY: getuid has no preconditions and cannot fail.
    let uid = unsafe { libc::getuid() };
    uid.to_string()
}

#[cfg(not(unix))]
fn current_owner() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "unknown".to_string())
}
