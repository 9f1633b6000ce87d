//! Views over the annotated pull list: six-star hits, history rows and
//! per-rarity chart series.
//!
//! Everything here walks `(record, pity)` pairs by index; nothing searches
//! the list for a record's position.

use serde::Serialize;

use crate::catalog::CharacterLookup;
use crate::error::Result;
use crate::models::{NormalizedRecord, RARITIES};
use crate::pity::ensure_aligned;
use crate::stats::MonthlyHistogram;

/// Upper bound (inclusive) of the green pity band.
pub const GREEN_PITY_MAX: u32 = 30;

/// Upper bound (inclusive) of the yellow pity band.
pub const YELLOW_PITY_MAX: u32 = 55;

/// How lucky a draw was, judged by its pity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PityBand {
    Green,
    Yellow,
    Red,
}

impl PityBand {
    pub fn from_pity(pity: u32) -> Self {
        if pity <= GREEN_PITY_MAX {
            PityBand::Green
        } else if pity <= YELLOW_PITY_MAX {
            PityBand::Yellow
        } else {
            PityBand::Red
        }
    }
}

/// One six-star draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SixStarHit {
    pub item_id: String,
    pub name: String,
    pub pity: u32,
    pub create_time: String,
    pub pool_name: String,
    pub band: PityBand,
}

/// One line of the pull history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub create_time: String,
    pub banner: String,
    pub pity: u32,
    pub name: String,
    pub rarity: u8,
    pub band: PityBand,
}

/// Every six-star draw, newest first.
pub fn recent_six_stars(
    records: &[NormalizedRecord],
    pity: &[u32],
    lookup: &impl CharacterLookup,
) -> Result<Vec<SixStarHit>> {
    ensure_aligned(records, pity)?;
    let mut hits = Vec::new();

    for (record, &p) in records.iter().zip(pity).rev() {
        let Some(id) = record.item() else { continue };
        let info = lookup.resolve(id)?;
        if !info.is_six_star() {
            continue;
        }
        hits.push(SixStarHit {
            item_id: id.to_string(),
            name: info.name.clone(),
            pity: p,
            create_time: record.create_time.clone(),
            pool_name: record.pool_name.clone(),
            band: PityBand::from_pity(p),
        });
    }

    Ok(hits)
}

/// History rows newest first, optionally restricted to one rarity.
///
/// Records without items have no name or rarity and are left out.
pub fn history_rows(
    records: &[NormalizedRecord],
    pity: &[u32],
    rarity_filter: Option<u8>,
    lookup: &impl CharacterLookup,
) -> Result<Vec<HistoryRow>> {
    ensure_aligned(records, pity)?;
    let mut rows = Vec::new();

    for (record, &p) in records.iter().zip(pity).rev() {
        let Some(id) = record.item() else { continue };
        let info = lookup.resolve(id)?;
        if rarity_filter.is_some_and(|r| r != info.rarity) {
            continue;
        }
        rows.push(HistoryRow {
            create_time: record.create_time.clone(),
            banner: lookup.banner_name(&record.pool_name).to_string(),
            pity: p,
            name: info.name.clone(),
            rarity: info.rarity,
            band: PityBand::from_pity(p),
        });
    }

    Ok(rows)
}

/// Month labels plus one series per rarity, aligned with the labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    /// `(rarity, counts)` for rarities 2–6 in ascending order.
    pub series: Vec<(u8, Vec<u32>)>,
}

impl ChartSeries {
    /// `false` when every count is zero.
    pub fn has_data(&self) -> bool {
        self.series
            .iter()
            .any(|(_, counts)| counts.iter().any(|&c| c > 0))
    }
}

pub fn chart_series(histogram: &MonthlyHistogram) -> ChartSeries {
    let labels: Vec<String> = histogram.months().map(str::to_string).collect();
    let series = RARITIES
        .iter()
        .map(|&rarity| {
            let counts = labels.iter().map(|m| histogram.get(m, rarity)).collect();
            (rarity, counts)
        })
        .collect();
    ChartSeries { labels, series }
}
