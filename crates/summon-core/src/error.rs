use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the summon tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An import or database payload failed the boundary shape checks.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Persisting would exceed the storage quota.
    #[error("Storage quota exceeded: {required} bytes required, limit is {limit} bytes")]
    StorageQuota { required: u64, limit: u64 },

    /// An item id is absent from the character catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// No profile with the given id exists.
    #[error("Profile not found: {0}")]
    ProfileNotFound(u64),

    /// The profile cannot be removed.
    #[error("Profile cannot be removed: {0}")]
    ProfileProtected(String),

    /// Pity values are not index-aligned with the records they annotate.
    #[error("Pity values do not match records: {records} records, {pity} pity values")]
    PityMismatch { records: usize, pity: usize },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// `true` for failures the caller should report as a warning while keeping
    /// its in-memory state.
    pub fn is_quota(&self) -> bool {
        matches!(self, TrackerError::StorageQuota { .. })
    }
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
