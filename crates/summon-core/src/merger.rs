//! Deduplicating merge of two raw record sets.

use std::collections::HashMap;

use crate::models::PullRecord;
use crate::timestamp::parse_create_time;

/// Build the identity key `"{createTime}_{poolId}_{id1-id2-...}"`.
///
/// Two records with equal keys describe the same draw event.
pub fn dedup_key(record: &PullRecord) -> String {
    let ids: Vec<String> = record.gain_ids.iter().map(|id| id.to_string()).collect();
    format!("{}_{}_{}", record.create_time, record.pool_id, ids.join("-"))
}

/// Merge `incoming` into `existing`, collapsing records with equal
/// [`dedup_key`]s and sorting the result by parsed `createTime`.
///
/// On a key collision the `incoming` record wins but keeps the position the
/// first occurrence had. Records with equal times stay in first-seen order;
/// unparseable times sort first.
pub fn merge(existing: &[PullRecord], incoming: &[PullRecord]) -> Vec<PullRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<PullRecord> = Vec::with_capacity(existing.len() + incoming.len());

    for record in existing.iter().chain(incoming.iter()) {
        let key = dedup_key(record);
        match positions.get(&key) {
            Some(&idx) => merged[idx] = record.clone(),
            None => {
                positions.insert(key, merged.len());
                merged.push(record.clone());
            }
        }
    }

    // `sort_by_cached_key` is stable, so ties keep insertion order.
    merged.sort_by_cached_key(|r| parse_create_time(&r.create_time));
    merged
}
