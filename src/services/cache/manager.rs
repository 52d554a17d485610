//! Content-addressed on-disk snapshot cache with an in-memory single-flight
//! guard.

use crate::error::{DsmError, Result};
use crate::models::snapshot::Snapshot;
use crate::services::snapshot_serializer;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Coordinates disk persistence for snapshots keyed by [`super::key::cache_key`].
/// Two threads racing on the same missing key share one computation: the
/// first to arrive inserts a `Mutex` placeholder that the rest block on.
pub struct CacheManager {
    cache_dir: PathBuf,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl CacheManager {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| DsmError::CacheError {
            detail: format!("failed to create cache directory {}: {e}", cache_dir.display()),
        })?;
        Ok(Self {
            cache_dir,
            in_flight: DashMap::new(),
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.dsm"))
    }

    /// Reads a cached snapshot, if present and valid, without invoking `compute`.
    pub fn get(&self, key: &str) -> Option<Snapshot> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).ok()?;
        snapshot_serializer::load(&bytes).ok()
    }

    /// Returns the cached snapshot for `key`, computing and persisting it via
    /// `compute` on a miss. Concurrent callers for the same key block on a
    /// shared guard rather than each recomputing.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<Snapshot>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        if let Some(snapshot) = self.get(key) {
            return Ok(snapshot);
        }

        let guard = self
            .in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _held = guard.lock();

        // Another thread may have populated the entry while we waited for the lock.
        if let Some(snapshot) = self.get(key) {
            self.in_flight.remove(key);
            return Ok(snapshot);
        }

        let snapshot = compute();
        self.in_flight.remove(key);
        let snapshot = snapshot?;
        self.put(key, &snapshot)?;
        Ok(snapshot)
    }

    /// Atomically writes `snapshot` under `key`: serialize to a sibling
    /// temporary file, then rename over the final path so a reader never
    /// observes a partially-written entry.
    pub fn put(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let final_path = self.entry_path(key);
        let tmp_path = self.cache_dir.join(format!("{key}.{}.tmp", std::process::id()));

        let bytes = snapshot_serializer::save(snapshot)?;
        write_atomic(&tmp_path, &final_path, &bytes)
    }

    pub fn invalidate(&self, key: &str) {
        let _ = fs::remove_file(self.entry_path(key));
    }

    pub fn clear(&self) -> Result<()> {
        let entries = fs::read_dir(&self.cache_dir).map_err(|e| DsmError::CacheError {
            detail: format!("failed to read cache directory: {e}"),
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("dsm") {
                let _ = fs::remove_file(path);
            }
        }
        Ok(())
    }
}

fn write_atomic(tmp_path: &Path, final_path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(tmp_path, bytes).map_err(|e| DsmError::CacheError {
        detail: format!("failed to write temp cache file {}: {e}", tmp_path.display()),
    })?;
    fs::rename(tmp_path, final_path).map_err(|e| DsmError::CacheError {
        detail: format!("failed to finalize cache file {}: {e}", final_path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::{GraphData, SourceToDeps};
    use crate::models::metrics::DsmMetrics;
    use crate::models::snapshot::FilterSpec;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            format_version: crate::models::snapshot::SNAPSHOT_FORMAT_VERSION,
            tool_version: "test".to_string(),
            created_at: chrono::Utc::now(),
            project_root: "/proj".to_string(),
            build_dir_hash: 7,
            filter_spec: FilterSpec {
                include_patterns: vec![],
                exclude_patterns: vec![],
                system_prefixes: vec![],
                third_party_patterns: vec![],
            },
            graph: GraphData::default(),
            source_to_deps: SourceToDeps::default(),
            metrics: DsmMetrics::empty(),
            precise: true,
            centrality_sampled: false,
        }
    }

    #[test]
    fn stores_and_retrieves_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path()).unwrap();
        let snap = sample_snapshot();
        cache.put("abc123", &snap).unwrap();
        let loaded = cache.get("abc123").unwrap();
        assert_eq!(loaded.project_root, snap.project_root);
    }

    #[test]
    fn get_or_compute_only_invokes_closure_on_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path()).unwrap();
        let mut calls = 0;
        let snap = cache
            .get_or_compute("key1", || {
                calls += 1;
                Ok(sample_snapshot())
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(snap.build_dir_hash, 7);

        let calls_before = calls;
        let _ = cache.get_or_compute("key1", || {
            calls += 1;
            Ok(sample_snapshot())
        });
        assert_eq!(calls, calls_before);
    }

    #[test]
    fn invalidate_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path()).unwrap();
        cache.put("k", &sample_snapshot()).unwrap();
        cache.invalidate("k");
        assert!(cache.get("k").is_none());
    }
}
