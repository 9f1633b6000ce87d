//! The active profile's pull database and the operations that change it.
//!
//! [`Dataset`] threads records between the boundary ([`crate::reader`]), the
//! core merge and the [`ProfileStore`]. A rejected payload leaves the
//! in-memory records untouched; a failed save leaves them valid and is
//! reported through [`PersistStatus`] instead of an error.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use summon_core::catalog::CharacterLookup;
use summon_core::merger::merge;
use summon_core::models::PullRecord;
use summon_core::Result;
use tracing::{info, warn};

use crate::analysis::{analyze, AnalysisResult};
use crate::export::write_export;
use crate::reader::{load_database_file, load_import_file};
use crate::storage::{CacheMeta, Profile, ProfileStore};

/// Outcome of writing the dataset to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistStatus {
    Saved(CacheMeta),
    /// Nothing to save (empty import result).
    Skipped,
    /// The store is full; the in-memory dataset is still valid.
    QuotaExceeded(String),
    Failed(String),
}

/// Result of an import or database load.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Records read from the file.
    pub received: usize,
    /// Records not present before.
    pub added: usize,
    /// Records in the dataset afterwards.
    pub total: usize,
    pub persisted: PersistStatus,
}

pub struct Dataset {
    store: ProfileStore,
    records: Vec<PullRecord>,
}

impl Dataset {
    /// Load the active profile's cached records from `store`.
    pub fn open(store: ProfileStore) -> Result<Self> {
        let records = store.load_cache()?;
        info!(
            "Profile {} loaded with {} records",
            store.active().name,
            records.len()
        );
        Ok(Self { store, records })
    }

    pub fn records(&self) -> &[PullRecord] {
        &self.records
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn analyze(&self, lookup: &impl CharacterLookup) -> Result<AnalysisResult> {
        analyze(&self.records, lookup)
    }

    // ── Imports ───────────────────────────────────────────────────────────

    /// Merge a game history export into the dataset and save it when the
    /// result is non-empty.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        let incoming = load_import_file(path)?;
        let before = self.records.len();
        self.records = merge(&self.records, &incoming);

        let persisted = if self.records.is_empty() {
            PersistStatus::Skipped
        } else {
            self.persist()
        };

        let outcome = ImportOutcome {
            received: incoming.len(),
            added: self.records.len().saturating_sub(before),
            total: self.records.len(),
            persisted,
        };
        info!(
            "Imported {} records from {} ({} new, {} total)",
            outcome.received,
            path.display(),
            outcome.added,
            outcome.total
        );
        Ok(outcome)
    }

    /// Replace the dataset with a saved database file and save it.
    pub fn load_database_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        let loaded = load_database_file(path)?;
        let received = loaded.len();
        self.records = loaded;

        let outcome = ImportOutcome {
            received,
            added: received,
            total: received,
            persisted: self.persist(),
        };
        info!("Loaded database {} ({} records)", path.display(), received);
        Ok(outcome)
    }

    /// Write the dataset to the store, reporting rather than propagating
    /// failures.
    pub fn persist(&self) -> PersistStatus {
        match self.store.save_cache(&self.records) {
            Ok(meta) => PersistStatus::Saved(meta),
            Err(e) if e.is_quota() => {
                warn!("Not enough storage space: {}", e);
                PersistStatus::QuotaExceeded(e.to_string())
            }
            Err(e) => {
                warn!("Save error: {}", e);
                PersistStatus::Failed(e.to_string())
            }
        }
    }

    // ── Export / clear ────────────────────────────────────────────────────

    pub fn export(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        write_export(dir, &self.store.active().name, &self.records, date)
    }

    /// Delete the stored cache and empty the dataset.
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear_cache()?;
        self.records.clear();
        info!("Cleared data for profile {}", self.store.active().name);
        Ok(())
    }

    // ── Profiles ──────────────────────────────────────────────────────────

    pub fn add_profile(&mut self, name: &str) -> Result<Profile> {
        let profile = self.store.add_profile(name)?;
        self.reload()?;
        Ok(profile)
    }

    pub fn switch_profile(&mut self, id: u64) -> Result<()> {
        self.store.switch_profile(id)?;
        self.reload()
    }

    pub fn remove_profile(&mut self) -> Result<Profile> {
        let removed = self.store.remove_active_profile()?;
        self.reload()?;
        Ok(removed)
    }

    fn reload(&mut self) -> Result<()> {
        self.records = self.store.load_cache()?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
