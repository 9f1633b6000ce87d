//! Full analysis pipeline.
//!
//! Runs normalize → annotate → summarize over a raw record set and returns
//! everything the presentation layer needs in one [`AnalysisResult`]. The
//! pipeline is re-run in full after every dataset change.

use std::time::Instant;

use summon_core::catalog::CharacterLookup;
use summon_core::history::{
    chart_series, history_rows, recent_six_stars, ChartSeries, HistoryRow, SixStarHit,
};
use summon_core::models::{NormalizedRecord, PullRecord};
use summon_core::normalizer::normalize;
use summon_core::pity::annotate;
use summon_core::stats::{summarize, PullSummary};
use summon_core::Result;
use tracing::debug;

// ── Public types ──────────────────────────────────────────────────────────────

/// The complete output of [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Single-pull records in chronological order.
    pub normalized: Vec<NormalizedRecord>,
    /// Pity of each entry in `normalized`, same index.
    pub pity: Vec<u32>,
    pub summary: PullSummary,
    /// Six-star draws, newest first.
    pub recent_six_stars: Vec<SixStarHit>,
    /// Number of raw records the analysis started from.
    pub raw_count: usize,
}

impl AnalysisResult {
    /// History rows newest first, optionally restricted to one rarity.
    pub fn history(
        &self,
        rarity_filter: Option<u8>,
        lookup: &impl CharacterLookup,
    ) -> Result<Vec<HistoryRow>> {
        history_rows(&self.normalized, &self.pity, rarity_filter, lookup)
    }

    /// Per-rarity monthly series for charting.
    pub fn chart(&self) -> ChartSeries {
        chart_series(&self.summary.monthly_histogram)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline over `raw`, which must be in chronological order
/// (as produced by [`summon_core::merger::merge`]).
pub fn analyze(raw: &[PullRecord], lookup: &impl CharacterLookup) -> Result<AnalysisResult> {
    let start = Instant::now();

    let normalized = normalize(raw);
    let pity = annotate(&normalized, lookup)?;
    let summary = summarize(&normalized, &pity, lookup)?;
    let recent = recent_six_stars(&normalized, &pity, lookup)?;

    debug!(
        raw = raw.len(),
        pulls = summary.total_pulls,
        six_stars = summary.six_star_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(AnalysisResult {
        normalized,
        pity,
        summary,
        recent_six_stars: recent,
        raw_count: raw.len(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
