//! Aggregate statistics over an annotated pull list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CharacterLookup;
use crate::error::Result;
use crate::models::{NormalizedRecord, RARITIES};
use crate::pity::ensure_aligned;

/// Month key (`"YYYY-MM"`) → rarity → number of items obtained.
///
/// Every month present carries a bucket for each rarity 2–6.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyHistogram {
    months: BTreeMap<String, BTreeMap<u8, u32>>,
}

impl MonthlyHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `month` exists with all buckets zeroed.
    fn touch(&mut self, month: &str) -> &mut BTreeMap<u8, u32> {
        self.months
            .entry(month.to_string())
            .or_insert_with(|| RARITIES.iter().map(|&r| (r, 0)).collect())
    }

    fn add(&mut self, month: &str, rarity: u8) {
        *self.touch(month).entry(rarity).or_insert(0) += 1;
    }

    /// Count for one month and rarity; `0` when either is absent.
    pub fn get(&self, month: &str, rarity: u8) -> u32 {
        self.months
            .get(month)
            .and_then(|buckets| buckets.get(&rarity))
            .copied()
            .unwrap_or(0)
    }

    /// Month keys in ascending order.
    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.months.keys().map(String::as_str)
    }

    /// Buckets of one month.
    pub fn buckets(&self, month: &str) -> Option<&BTreeMap<u8, u32>> {
        self.months.get(month)
    }

    /// Sum over every month and rarity.
    pub fn total(&self) -> u64 {
        self.months
            .values()
            .flat_map(|buckets| buckets.values())
            .map(|&c| u64::from(c))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Headline numbers for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullSummary {
    pub total_pulls: usize,
    pub six_star_count: usize,
    /// `six_star_count / total_pulls`, `0.0` for an empty dataset.
    pub six_star_rate: f64,
    /// Mean pity of six-star draws, rounded; `0` when there were none.
    pub average_pity_at_six_star: u32,
    pub monthly_histogram: MonthlyHistogram,
}

/// Summarize `records` using the index-aligned `pity` values from
/// [`crate::pity::annotate`].
///
/// Each record contributes the rarity of its first item. A record without
/// items still counts as a pull and opens its month, but fills no bucket.
/// Slices of different lengths fail with
/// [`PityMismatch`](crate::error::TrackerError::PityMismatch).
pub fn summarize(
    records: &[NormalizedRecord],
    pity: &[u32],
    lookup: &impl CharacterLookup,
) -> Result<PullSummary> {
    ensure_aligned(records, pity)?;

    let total_pulls = records.len();
    let mut six_star_count = 0usize;
    let mut pity_sum = 0u64;
    let mut histogram = MonthlyHistogram::new();

    for (record, &p) in records.iter().zip(pity) {
        let month = record.month_key();
        let Some(id) = record.item() else {
            histogram.touch(month);
            continue;
        };

        let info = lookup.resolve(id)?;
        if info.is_six_star() {
            six_star_count += 1;
            pity_sum += u64::from(p);
        }
        histogram.add(month, info.rarity);
    }

    let six_star_rate = if total_pulls == 0 {
        0.0
    } else {
        six_star_count as f64 / total_pulls as f64
    };

    let average_pity_at_six_star = if six_star_count == 0 {
        0
    } else {
        (pity_sum as f64 / six_star_count as f64).round() as u32
    };

    Ok(PullSummary {
        total_pulls,
        six_star_count,
        six_star_rate,
        average_pity_at_six_star,
        monthly_histogram: histogram,
    })
}
