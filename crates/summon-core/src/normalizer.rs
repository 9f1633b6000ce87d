//! Expansion of bulk pulls into single-pull records.

use crate::models::{NormalizedRecord, PullRecord, BULK_SIZE, BULK_SUMMON_TYPE};

/// Expand every ten-item bulk pull into ten single-pull records.
///
/// A record is expanded only when `summon_type == 10` and it carries exactly
/// ten items; each item becomes its own record in the original item order.
/// Every other record is copied once with `summon_type` forced to `1` and its
/// `gain_ids` left untouched, including empty or multi-item lists.
pub fn normalize(records: &[PullRecord]) -> Vec<NormalizedRecord> {
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        if record.summon_type == BULK_SUMMON_TYPE && record.gain_ids.len() == BULK_SIZE {
            for id in &record.gain_ids {
                let single = PullRecord {
                    gain_ids: vec![id.clone()],
                    ..record.clone()
                };
                out.push(NormalizedRecord::from_raw(single));
            }
        } else {
            out.push(NormalizedRecord::from_raw(record.clone()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ident;

    fn record(summon_type: i64, ids: &[&str]) -> PullRecord {
        PullRecord {
            create_time: "2024-01-01T00:00:00".to_string(),
            pool_id: Ident::from("A"),
            pool_name: "Standard".to_string(),
            summon_type,
            gain_ids: ids.iter().map(|id| Ident::from(*id)).collect(),
            ..Default::default()
        }
    }

    const TEN: [&str; 10] = ["x1", "x2", "x3", "x4", "x5", "x6", "x7", "x8", "x9", "x10"];

    #[test]
    fn test_bulk_pull_expands_to_ten() {
        let out = normalize(&[record(10, &TEN)]);

        assert_eq!(out.len(), 10);
        for (normalized, expected) in out.iter().zip(TEN.iter()) {
            assert_eq!(normalized.summon_type, 1);
            assert_eq!(normalized.gain_ids, vec![Ident::from(*expected)]);
            assert_eq!(normalized.create_time, "2024-01-01T00:00:00");
            assert_eq!(normalized.pool_id, Ident::from("A"));
            assert_eq!(normalized.pool_name, "Standard");
        }
    }

    #[test]
    fn test_single_pull_copied_once() {
        let out = normalize(&[record(1, &["x1"])]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].summon_type, 1);
        assert_eq!(out[0].gain_ids, vec![Ident::from("x1")]);
    }

    #[test]
    fn test_bulk_type_with_wrong_length_passes_through() {
        let out = normalize(&[record(10, &["x1", "x2", "x3"])]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].summon_type, 1);
        assert_eq!(out[0].gain_ids.len(), 3);
    }

    #[test]
    fn test_ten_items_without_bulk_type_pass_through() {
        let out = normalize(&[record(2, &TEN)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].summon_type, 1);
        assert_eq!(out[0].gain_ids.len(), 10);
    }

    #[test]
    fn test_empty_gain_ids_pass_through() {
        let out = normalize(&[record(1, &[])]);
        assert_eq!(out.len(), 1);
        assert!(out[0].gain_ids.is_empty());
    }

    #[test]
    fn test_items_preserved_in_order() {
        let input = vec![record(1, &["a"]), record(10, &TEN), record(1, &["b", "c"])];
        let out = normalize(&input);

        let flattened: Vec<Ident> = out.iter().flat_map(|r| r.gain_ids.clone()).collect();
        let original: Vec<Ident> = input.iter().flat_map(|r| r.gain_ids.clone()).collect();
        assert_eq!(flattened, original);
        assert_eq!(out.len(), 12);
        assert!(out.len() >= input.len());
    }

    #[test]
    fn test_extra_fields_copied() {
        let mut bulk = record(10, &TEN);
        bulk.extra
            .insert("uid".to_string(), serde_json::json!("player-1"));
        let out = normalize(&[bulk]);
        assert!(out.iter().all(|r| r.extra["uid"] == "player-1"));
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(&[]).is_empty());
    }
}
