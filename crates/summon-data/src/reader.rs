//! Import and database file loading.
//!
//! Everything entering the tracker passes through here. Payloads are checked
//! as untyped JSON first; a failed check rejects the whole file before any
//! record reaches the merge step.

use std::path::Path;

use serde_json::Value;
use summon_core::models::PullRecord;
use summon_core::{Result, TrackerError};
use tracing::{debug, warn};

// ── Validation ────────────────────────────────────────────────────────────────

/// Check a game history export: `{ "data": { "pageData": [...] } }`.
pub fn validate_import(data: &Value) -> Result<()> {
    if !data.is_object() {
        return Err(TrackerError::Validation(
            "file is damaged or has the wrong format".to_string(),
        ));
    }

    let Some(page) = data
        .get("data")
        .and_then(|d| d.get("pageData"))
        .and_then(Value::as_array)
    else {
        return Err(TrackerError::Validation(
            "unexpected JSON structure: expected a summon history export with data.pageData"
                .to_string(),
        ));
    };

    if let Some(sample) = page.first() {
        if !has_required_fields(sample) {
            return Err(TrackerError::Validation(
                "records do not match the summon history format".to_string(),
            ));
        }
    }

    Ok(())
}

/// Check a saved database: a bare array of records.
pub fn validate_database(data: &Value) -> Result<()> {
    let Some(records) = data.as_array() else {
        return Err(TrackerError::Validation(
            "database file is damaged".to_string(),
        ));
    };

    if let Some(sample) = records.first() {
        if !has_required_fields(sample) {
            return Err(TrackerError::Validation(
                "invalid database format".to_string(),
            ));
        }
    }

    Ok(())
}

/// `createTime`, `poolId` and `gainIds` present and non-empty.
fn has_required_fields(sample: &Value) -> bool {
    let create_time = sample
        .get("createTime")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());

    let pool_id = match sample.get("poolId") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };

    let gain_ids = sample
        .get("gainIds")
        .and_then(Value::as_array)
        .is_some_and(|ids| !ids.is_empty());

    create_time && pool_id && gain_ids
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Validate and decode a history export document.
pub fn parse_import_str(content: &str) -> Result<Vec<PullRecord>> {
    let mut json: Value = serde_json::from_str(content)?;
    validate_import(&json)?;

    let page = json["data"]["pageData"].take();
    let records = decode_records(page)?;
    debug!("Decoded {} records from history export", records.len());
    Ok(records)
}

/// Validate and decode a saved database document.
pub fn parse_database_str(content: &str) -> Result<Vec<PullRecord>> {
    let json: Value = serde_json::from_str(content)?;
    validate_database(&json)?;

    let records = decode_records(json)?;
    debug!("Decoded {} records from database", records.len());
    Ok(records)
}

/// Decode each element of a validated record array.
///
/// Field types are coerced by [`PullRecord`]'s decoders, so only elements
/// that are not JSON objects are dropped.
fn decode_records(array: Value) -> Result<Vec<PullRecord>> {
    let Value::Array(items) = array else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!("Skipping record {}: not a JSON object", index);
            continue;
        }
        records.push(serde_json::from_value(item)?);
    }
    Ok(records)
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Read a `.json` file; other extensions are rejected unread.
pub fn read_json_file(path: &Path) -> Result<String> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(TrackerError::Validation(format!(
            "expected a .json file, got {}",
            path.display()
        )));
    }

    std::fs::read_to_string(path).map_err(|source| TrackerError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_import_file(path: &Path) -> Result<Vec<PullRecord>> {
    parse_import_str(&read_json_file(path)?)
}

pub fn load_database_file(path: &Path) -> Result<Vec<PullRecord>> {
    parse_database_str(&read_json_file(path)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
