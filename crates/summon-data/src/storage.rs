//! File-backed profile store.
//!
//! Layout under the data directory:
//!
//! * `profiles.json` – profile list and the active profile id
//! * `cache_<id>.json` – the profile's raw record array
//! * `meta_<id>.json` – `{ "lastSave": ..., "pullsCount": ... }`
//!
//! All cache files together are bounded by a byte quota; a save that would
//! exceed it fails with [`TrackerError::StorageQuota`] and leaves the previous
//! files in place.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use summon_core::models::PullRecord;
use summon_core::{Result, TrackerError};
use tracing::{debug, info, warn};

/// Id of the profile seeded on first use; it can never be removed.
pub const DEFAULT_PROFILE_ID: u64 = 1;

pub const DEFAULT_PROFILE_NAME: &str = "Main";

const INDEX_FILE: &str = "profiles.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
}

/// Metadata written next to every saved cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMeta {
    /// ISO-8601 UTC timestamp of the save.
    pub last_save: String,
    pub pulls_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileIndex {
    profiles: Vec<Profile>,
    active: u64,
}

impl Default for ProfileIndex {
    fn default() -> Self {
        Self {
            profiles: vec![Profile {
                id: DEFAULT_PROFILE_ID,
                name: DEFAULT_PROFILE_NAME.to_string(),
            }],
            active: DEFAULT_PROFILE_ID,
        }
    }
}

/// Profiles and their cached pull databases in one directory.
#[derive(Debug)]
pub struct ProfileStore {
    root: PathBuf,
    quota_bytes: u64,
    index: ProfileIndex,
}

impl ProfileStore {
    /// Open (or initialise) the store rooted at `root`.
    pub fn open(root: &Path, quota_bytes: u64) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let index_path = root.join(INDEX_FILE);

        let mut index: ProfileIndex = match std::fs::read_to_string(&index_path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ProfileIndex::default(),
            Err(source) => {
                return Err(TrackerError::FileRead {
                    path: index_path,
                    source,
                })
            }
        };

        if index.profiles.is_empty() {
            index = ProfileIndex::default();
        }
        if !index.profiles.iter().any(|p| p.id == index.active) {
            index.active = index.profiles[0].id;
        }

        let store = Self {
            root: root.to_path_buf(),
            quota_bytes,
            index,
        };
        store.write_index()?;
        debug!(
            "Opened profile store at {} ({} profiles)",
            store.root.display(),
            store.index.profiles.len()
        );
        Ok(store)
    }

    // ── Profiles ──────────────────────────────────────────────────────────

    pub fn profiles(&self) -> &[Profile] {
        &self.index.profiles
    }

    pub fn active_id(&self) -> u64 {
        self.index.active
    }

    pub fn active(&self) -> &Profile {
        self.index
            .profiles
            .iter()
            .find(|p| p.id == self.index.active)
            .unwrap_or(&self.index.profiles[0])
    }

    /// Create a profile named `name` and make it active.
    pub fn add_profile(&mut self, name: &str) -> Result<Profile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation(
                "profile name must not be empty".to_string(),
            ));
        }

        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let next_free = self
            .index
            .profiles
            .iter()
            .map(|p| p.id + 1)
            .max()
            .unwrap_or(DEFAULT_PROFILE_ID);
        let profile = Profile {
            id: now_ms.max(next_free),
            name: name.to_string(),
        };

        self.index.profiles.push(profile.clone());
        self.index.active = profile.id;
        self.write_index()?;
        info!("Created profile {} ({})", profile.name, profile.id);
        Ok(profile)
    }

    pub fn switch_profile(&mut self, id: u64) -> Result<()> {
        if !self.index.profiles.iter().any(|p| p.id == id) {
            return Err(TrackerError::ProfileNotFound(id));
        }
        self.index.active = id;
        self.write_index()?;
        debug!("Switched to profile {}", id);
        Ok(())
    }

    /// Delete the active profile with its cache and metadata, then activate
    /// the first remaining profile.
    pub fn remove_active_profile(&mut self) -> Result<Profile> {
        let active = self.active().clone();
        if self.index.profiles.len() == 1 || active.id == DEFAULT_PROFILE_ID {
            return Err(TrackerError::ProfileProtected(active.name));
        }

        self.clear_cache()?;
        self.index.profiles.retain(|p| p.id != active.id);
        self.index.active = self.index.profiles[0].id;
        self.write_index()?;
        info!("Removed profile {} ({})", active.name, active.id);
        Ok(active)
    }

    // ── Cache ─────────────────────────────────────────────────────────────

    /// Records cached for the active profile; empty when nothing was saved.
    pub fn load_cache(&self) -> Result<Vec<PullRecord>> {
        let path = self.cache_path(self.index.active);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(TrackerError::FileRead { path, source }),
        }
    }

    pub fn load_meta(&self) -> Result<Option<CacheMeta>> {
        let path = self.meta_path(self.index.active);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TrackerError::FileRead { path, source }),
        }
    }

    /// Persist `records` and their metadata for the active profile.
    pub fn save_cache(&self, records: &[PullRecord]) -> Result<CacheMeta> {
        let id = self.index.active;
        let payload = serde_json::to_string(records)?;

        let required = self.used_bytes_excluding(id) + payload.len() as u64;
        if required > self.quota_bytes {
            return Err(TrackerError::StorageQuota {
                required,
                limit: self.quota_bytes,
            });
        }

        let meta = CacheMeta {
            last_save: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            pulls_count: records.len(),
        };
        write_atomic(&self.cache_path(id), &payload)?;

        // Metadata describing the previous cache must not outlive it.
        let meta_path = self.meta_path(id);
        if let Err(e) = write_atomic(&meta_path, &serde_json::to_string(&meta)?) {
            warn!("Cannot write {}: {}", meta_path.display(), e);
            if meta_path.exists() {
                std::fs::remove_file(&meta_path)?;
            }
            return Err(e);
        }

        debug!("Saved {} records for profile {}", records.len(), id);
        Ok(meta)
    }

    /// Remove the active profile's cache and metadata if present.
    pub fn clear_cache(&self) -> Result<()> {
        let id = self.index.active;
        for path in [self.cache_path(id), self.meta_path(id)] {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn cache_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("cache_{}.json", id))
    }

    fn meta_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("meta_{}.json", id))
    }

    fn write_index(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.index)?;
        write_atomic(&self.root.join(INDEX_FILE), &json)
    }

    /// Bytes used by every profile cache except `id`'s.
    fn used_bytes_excluding(&self, id: u64) -> u64 {
        let mut total = 0u64;
        for profile in &self.index.profiles {
            if profile.id == id {
                continue;
            }
            if let Ok(meta) = std::fs::metadata(self.cache_path(profile.id)) {
                total += meta.len();
            }
        }
        total
    }
}

/// Write to a temp file then rename for atomicity.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use summon_core::models::Ident;
    use tempfile::TempDir;

    const NO_LIMIT: u64 = u64::MAX;

    fn records(n: usize) -> Vec<PullRecord> {
        (0..n)
            .map(|i| PullRecord {
                create_time: format!("2024-01-01 00:00:{:02}", i),
                pool_id: Ident::Number(1),
                pool_name: "Standard".to_string(),
                summon_type: 1,
                gain_ids: vec![Ident::Number(3000 + i as i64)],
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_open_seeds_default_profile() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();

        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.active().id, DEFAULT_PROFILE_ID);
        assert_eq!(store.active().name, DEFAULT_PROFILE_NAME);
        assert!(dir.path().join("profiles.json").exists());
    }

    #[test]
    fn test_add_and_switch_persist() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        let alt = store.add_profile("  Alt  ").unwrap();
        assert_eq!(alt.name, "Alt");
        assert!(alt.id > DEFAULT_PROFILE_ID);
        assert_eq!(store.active_id(), alt.id);

        let reopened = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        assert_eq!(reopened.profiles().len(), 2);
        assert_eq!(reopened.active_id(), alt.id);

        let mut store = reopened;
        store.switch_profile(DEFAULT_PROFILE_ID).unwrap();
        assert_eq!(store.active_id(), DEFAULT_PROFILE_ID);
    }

    #[test]
    fn test_add_profile_ids_unique() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        let a = store.add_profile("a").unwrap();
        let b = store.add_profile("b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_profile_rejects_blank_name() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        assert!(matches!(
            store.add_profile("   "),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn test_switch_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        let err = store.switch_profile(999).unwrap_err();
        assert!(matches!(err, TrackerError::ProfileNotFound(999)));
        assert_eq!(store.active_id(), DEFAULT_PROFILE_ID);
    }

    #[test]
    fn test_default_profile_cannot_be_removed() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        assert!(matches!(
            store.remove_active_profile(),
            Err(TrackerError::ProfileProtected(_))
        ));

        store.add_profile("Alt").unwrap();
        store.switch_profile(DEFAULT_PROFILE_ID).unwrap();
        assert!(store.remove_active_profile().is_err());
    }

    #[test]
    fn test_remove_profile_deletes_data() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        let alt = store.add_profile("Alt").unwrap();
        store.save_cache(&records(3)).unwrap();
        assert!(dir.path().join(format!("cache_{}.json", alt.id)).exists());

        let removed = store.remove_active_profile().unwrap();
        assert_eq!(removed.id, alt.id);
        assert_eq!(store.active_id(), DEFAULT_PROFILE_ID);
        assert_eq!(store.profiles().len(), 1);
        assert!(!dir.path().join(format!("cache_{}.json", alt.id)).exists());
        assert!(!dir.path().join(format!("meta_{}.json", alt.id)).exists());
    }

    #[test]
    fn test_cache_round_trip_with_meta() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        assert!(store.load_cache().unwrap().is_empty());
        assert!(store.load_meta().unwrap().is_none());

        let saved = records(4);
        let meta = store.save_cache(&saved).unwrap();
        assert_eq!(meta.pulls_count, 4);
        assert!(meta.last_save.ends_with('Z'));

        assert_eq!(store.load_cache().unwrap(), saved);
        assert_eq!(store.load_meta().unwrap(), Some(meta));
    }

    #[test]
    fn test_failed_meta_write_drops_stale_meta() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        store.save_cache(&records(2)).unwrap();
        assert_eq!(store.load_meta().unwrap().unwrap().pulls_count, 2);

        // A directory where the temp file should go makes the meta write fail.
        std::fs::create_dir(dir.path().join("meta_1.json.tmp")).unwrap();

        assert!(store.save_cache(&records(5)).is_err());
        assert_eq!(store.load_cache().unwrap(), records(5));
        assert!(store.load_meta().unwrap().is_none());
    }

    #[test]
    fn test_meta_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        store.save_cache(&records(1)).unwrap();
        let raw = std::fs::read_to_string(dir.path().join("meta_1.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["pullsCount"], 1);
        assert!(value["lastSave"].is_string());
    }

    #[test]
    fn test_caches_are_per_profile() {
        let dir = TempDir::new().unwrap();
        let mut store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        store.save_cache(&records(2)).unwrap();

        store.add_profile("Alt").unwrap();
        assert!(store.load_cache().unwrap().is_empty());

        store.switch_profile(DEFAULT_PROFILE_ID).unwrap();
        assert_eq!(store.load_cache().unwrap().len(), 2);
    }

    #[test]
    fn test_clear_cache() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path(), NO_LIMIT).unwrap();
        store.save_cache(&records(2)).unwrap();
        store.clear_cache().unwrap();
        assert!(store.load_cache().unwrap().is_empty());
        assert!(store.load_meta().unwrap().is_none());
        // clearing twice is fine
        store.clear_cache().unwrap();
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_cache() {
        let dir = TempDir::new().unwrap();
        let small = records(1);
        let small_len = serde_json::to_string(&small).unwrap().len() as u64;
        let store = ProfileStore::open(dir.path(), small_len + 10).unwrap();

        store.save_cache(&small).unwrap();
        let err = store.save_cache(&records(50)).unwrap_err();
        assert!(err.is_quota());
        assert_eq!(store.load_cache().unwrap(), small);
    }

    #[test]
    fn test_quota_counts_other_profiles() {
        let dir = TempDir::new().unwrap();
        let batch = records(5);
        let batch_len = serde_json::to_string(&batch).unwrap().len() as u64;
        let mut store = ProfileStore::open(dir.path(), batch_len + batch_len / 2).unwrap();

        store.save_cache(&batch).unwrap();
        // Re-saving the same profile replaces its own usage.
        store.save_cache(&batch).unwrap();

        store.add_profile("Alt").unwrap();
        let err = store.save_cache(&batch).unwrap_err();
        assert!(matches!(err, TrackerError::StorageQuota { .. }));
    }
}
