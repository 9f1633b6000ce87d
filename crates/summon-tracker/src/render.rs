//! Plain-text rendering of analysis results for the terminal.

use summon_core::formatting::{band_label, format_count, format_rate, rarity_label};
use summon_core::history::{ChartSeries, HistoryRow, SixStarHit};
use summon_core::stats::PullSummary;
use summon_data::dataset::{ImportOutcome, PersistStatus};
use summon_data::storage::Profile;

pub fn render_summary(profile: &str, summary: &PullSummary) -> String {
    let mut out = format!("Profile: {}\n", profile);
    out.push_str(&format!(
        "Total pulls:   {}\n",
        format_count(summary.total_pulls as u64)
    ));
    out.push_str(&format!(
        "Six-stars:     {}\n",
        format_count(summary.six_star_count as u64)
    ));
    out.push_str(&format!(
        "Six-star rate: {}\n",
        format_rate(summary.six_star_rate)
    ));
    out.push_str(&format!(
        "Average pity:  {}\n",
        summary.average_pity_at_six_star
    ));
    out
}

/// Month-by-rarity table.
pub fn render_histogram(chart: &ChartSeries) -> String {
    if !chart.has_data() {
        return "Statistics will appear here after importing data.\n".to_string();
    }

    let mut out = format!("{:<8}", "Month");
    for (rarity, _) in &chart.series {
        out.push_str(&format!("{:>6}", rarity_label(*rarity)));
    }
    out.push('\n');

    for (i, month) in chart.labels.iter().enumerate() {
        out.push_str(&format!("{:<8}", month));
        for (_, counts) in &chart.series {
            out.push_str(&format!("{:>6}", counts[i]));
        }
        out.push('\n');
    }
    out
}

pub fn render_recent_six_stars(hits: &[SixStarHit]) -> String {
    if hits.is_empty() {
        return "Your latest six-star characters will appear here.\n".to_string();
    }

    let mut out = String::from("Recent six-stars:\n");
    for hit in hits {
        out.push_str(&format!(
            "  {:>3}  {:<20} {}  [{}]\n",
            hit.pity,
            hit.name,
            hit.create_time,
            band_label(hit.band)
        ));
    }
    out
}

pub fn render_history(rows: &[HistoryRow], rarity_filter: Option<u8>) -> String {
    if rows.is_empty() {
        return match rarity_filter {
            Some(r) => format!("No data for {}\n", rarity_label(r)),
            None => "No data yet\n".to_string(),
        };
    }

    let mut out = format!(
        "{:<20} {:<24} {:>4}  {}\n",
        "Time", "Banner", "Pity", "Character"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<20} {:<24} {:>4}  {} {}  [{}]\n",
            row.create_time,
            row.banner,
            row.pity,
            row.name,
            rarity_label(row.rarity),
            band_label(row.band)
        ));
    }
    out
}

pub fn render_outcome(outcome: &ImportOutcome) -> String {
    let mut out = format!(
        "Read {} records: {} new, {} total\n",
        outcome.received, outcome.added, outcome.total
    );
    match &outcome.persisted {
        PersistStatus::Saved(meta) => {
            out.push_str(&format!(
                "Saved {} records at {}\n",
                meta.pulls_count, meta.last_save
            ));
        }
        PersistStatus::Skipped => {}
        PersistStatus::QuotaExceeded(reason) => {
            out.push_str(&format!("Warning: not enough storage space ({})\n", reason));
        }
        PersistStatus::Failed(reason) => {
            out.push_str(&format!("Warning: could not save ({})\n", reason));
        }
    }
    out
}

pub fn render_profiles(profiles: &[Profile], active: u64) -> String {
    let mut out = String::new();
    for profile in profiles {
        let marker = if profile.id == active { '*' } else { ' ' };
        out.push_str(&format!("{} {:>13}  {}\n", marker, profile.id, profile.name));
    }
    out
}
