//! Character catalog: the item id → name/rarity lookup the pipeline depends on.
//!
//! The pipeline only needs [`CharacterLookup`]; [`Catalog`] is the table
//! loaded from a JSON file of the form
//!
//! ```json
//! {
//!   "characters": { "3003": { "name": "Regulus", "rarity": 6 } },
//!   "banners": { "Standard Channel": "Amongst the Lake" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::{CharacterInfo, Ident, MIN_RARITY, SIX_STAR};

/// Resolves an item id to its catalog entry.
///
/// Must be total over every id the dataset contains; a miss is reported as
/// [`TrackerError::UnknownItem`] rather than defaulted.
pub trait CharacterLookup {
    fn resolve(&self, id: &Ident) -> Result<&CharacterInfo>;

    /// Display name for a banner; defaults to the exported pool name.
    fn banner_name<'a>(&'a self, pool_name: &'a str) -> &'a str {
        pool_name
    }
}

/// In-memory catalog keyed by the textual form of the item id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    characters: HashMap<String, CharacterInfo>,
    banners: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    characters: HashMap<String, CharacterInfo>,
    #[serde(default)]
    banners: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a catalog file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TrackerError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        debug!(
            "Loaded catalog {} ({} characters, {} banners)",
            path.display(),
            catalog.characters.len(),
            catalog.banners.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog document, rejecting rarities outside 2–6.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let mut catalog = Self::new();
        for (id, info) in file.characters {
            catalog.insert(id, info)?;
        }
        catalog.banners = file.banners;
        Ok(catalog)
    }

    /// Add or replace one character entry.
    pub fn insert(&mut self, id: impl Into<String>, info: CharacterInfo) -> Result<()> {
        let id = id.into();
        if !(MIN_RARITY..=SIX_STAR).contains(&info.rarity) {
            return Err(TrackerError::Config(format!(
                "character {} has rarity {} outside {}-{}",
                id, info.rarity, MIN_RARITY, SIX_STAR
            )));
        }
        self.characters.insert(id, info);
        Ok(())
    }

    /// Register a display name for an exported pool name.
    pub fn insert_banner(&mut self, pool_name: impl Into<String>, display: impl Into<String>) {
        self.banners.insert(pool_name.into(), display.into());
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl CharacterLookup for Catalog {
    fn resolve(&self, id: &Ident) -> Result<&CharacterInfo> {
        self.characters
            .get(&id.to_string())
            .ok_or_else(|| TrackerError::UnknownItem(id.to_string()))
    }

    fn banner_name<'a>(&'a self, pool_name: &'a str) -> &'a str {
        self.banners
            .get(pool_name)
            .map(String::as_str)
            .unwrap_or(pool_name)
    }
}
