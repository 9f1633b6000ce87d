//! Pull-history engine for gacha summon tracking.
//!
//! Raw draw records are merged and deduplicated ([`merger`]), expanded into
//! single pulls ([`normalizer`]), annotated with per-banner pity ([`pity`])
//! and summarized ([`stats`], [`history`]). Every stage is a pure function of
//! its inputs and a [`catalog::CharacterLookup`].

pub mod catalog;
pub mod error;
pub mod formatting;
pub mod history;
pub mod merger;
pub mod models;
pub mod normalizer;
pub mod pity;
pub mod settings;
pub mod stats;
pub mod timestamp;

pub use error::{Result, TrackerError};
