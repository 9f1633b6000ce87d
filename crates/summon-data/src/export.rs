//! Database export as `{ProfileName}_{YYYY-MM-DD}.json`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use summon_core::models::PullRecord;
use summon_core::{Result, TrackerError};
use tracing::info;

/// File name for an export of `profile_name` taken on `date`.
///
/// Path separators in the profile name are replaced so the file always lands
/// in the chosen directory.
pub fn export_file_name(profile_name: &str, date: NaiveDate) -> String {
    let safe: String = profile_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_{}.json", safe, date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON array of `records`.
pub fn to_export_json(records: &[PullRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write `records` into `dir`, returning the written path.
///
/// An empty database is refused and nothing is written.
pub fn write_export(
    dir: &Path,
    profile_name: &str,
    records: &[PullRecord],
    date: NaiveDate,
) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(TrackerError::Validation("database is empty".to_string()));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(profile_name, date));
    std::fs::write(&path, to_export_json(records)?)?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}
