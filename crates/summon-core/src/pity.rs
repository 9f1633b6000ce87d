//! Per-banner pity counters.

use std::collections::HashMap;

use crate::catalog::CharacterLookup;
use crate::error::{Result, TrackerError};
use crate::models::{Ident, NormalizedRecord};

/// Running pity counters, one per banner.
///
/// A counter starts at `1` the first time its banner is seen, increments on
/// every draw, and returns to `1` after a six-star.
#[derive(Debug, Default)]
pub struct PityTracker {
    counters: HashMap<Ident, u32>,
}

impl PityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one draw on `pool` and return the pity it was made at.
    ///
    /// The returned value is read before the update, so a six-star reports
    /// the count that paid off.
    pub fn observe(&mut self, pool: &Ident, six_star: bool) -> u32 {
        let counter = self.counters.entry(pool.clone()).or_insert(1);
        let current = *counter;
        *counter = if six_star { 1 } else { current + 1 };
        current
    }

    /// Current counter for `pool` without recording a draw.
    pub fn current(&self, pool: &Ident) -> u32 {
        self.counters.get(pool).copied().unwrap_or(1)
    }
}

/// Compute the pity value of every record, index-aligned with `records`.
///
/// `records` must already be in ascending `createTime` order; out-of-order
/// input yields wrong values without any error. A record resets its banner
/// when any of its items is a six-star, which only matters for irregular
/// multi-item records; records without items count as non-six-star draws.
/// Every item is resolved, so an unknown id anywhere is an error.
pub fn annotate(records: &[NormalizedRecord], lookup: &impl CharacterLookup) -> Result<Vec<u32>> {
    let mut tracker = PityTracker::new();
    let mut pity = Vec::with_capacity(records.len());

    for record in records {
        let mut six_star = false;
        for id in &record.gain_ids {
            six_star |= lookup.resolve(id)?.is_six_star();
        }
        pity.push(tracker.observe(&record.pool_id, six_star));
    }

    Ok(pity)
}

/// Fail unless `pity` holds exactly one value per record.
pub fn ensure_aligned(records: &[NormalizedRecord], pity: &[u32]) -> Result<()> {
    if records.len() != pity.len() {
        return Err(TrackerError::PityMismatch {
            records: records.len(),
            pity: pity.len(),
        });
    }
    Ok(())
}
