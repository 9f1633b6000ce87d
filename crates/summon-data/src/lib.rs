//! Data layer for the summon tracker.
//!
//! Validates and loads history exports and saved databases, keeps per-profile
//! caches on disk, and runs the analysis pipeline over the active profile's
//! records.

pub mod analysis;
pub mod dataset;
pub mod export;
pub mod reader;
pub mod storage;

pub use summon_core as core;
