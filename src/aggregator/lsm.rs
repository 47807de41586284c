//! LSM state reconstruction from scanned structured records.
//!
//! Produces one frame per state-changing record, sorted by time, with the
//! latest known state of the two tracked column families carried forward
//! into every frame.

use crate::parser::event_log::ScannedLog;
use crate::parser::schema::{LsmData, LsmFrame, LsmMeta};
use crate::utils::config::{DEFAULT_LEFT_CF, DEFAULT_MAX_LEVELS, DEFAULT_RIGHT_CF, DETAIL_KEYS};
use log::debug;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Reconstruction options
///
/// **Public** - constructed from CLI args by commands
#[derive(Debug, Clone)]
pub struct LsmOptions {
    /// Column family tracked in every frame's `left_state`
    pub left_name: String,

    /// Column family tracked in every frame's `right_state`
    pub right_name: String,

    /// Level-count override; auto-detected from the log when `None`
    pub max_levels: Option<usize>,
}

impl Default for LsmOptions {
    fn default() -> Self {
        Self {
            left_name: DEFAULT_LEFT_CF.to_string(),
            right_name: DEFAULT_RIGHT_CF.to_string(),
            max_levels: None,
        }
    }
}

/// A record that survived filtering, waiting to be sorted and framed
struct PendingFrame {
    time_micros: i64,
    event: Option<String>,
    job: Option<i64>,
    cf_name: String,
    lsm_state: Vec<i64>,
    meta: serde_json::Map<String, Value>,
}

/// Reconstruct the LSM frame sequence from scanned records
///
/// **Public** - main entry point for reconstruction
///
/// Records without an `lsm_state` array, without a `time_micros`, or whose
/// column family cannot be resolved are dropped. State arrays are
/// normalized to exactly `max_levels` entries. The sort on `time_micros`
/// is stable, so same-instant records keep their log order.
pub fn reconstruct_lsm(scanned: &ScannedLog, options: &LsmOptions) -> LsmData {
    let max_levels = options.max_levels.unwrap_or(if scanned.detected_max_levels > 0 {
        scanned.detected_max_levels
    } else {
        DEFAULT_MAX_LEVELS
    });

    let mut filtered: Vec<PendingFrame> = Vec::new();
    for record in &scanned.records {
        let Some(state) = record.get("lsm_state").and_then(Value::as_array) else {
            continue;
        };
        let Some(time_micros) = record.get("time_micros").and_then(as_integer) else {
            continue;
        };
        let Some(cf_name) = scanned.resolve_cf_name(record) else {
            continue;
        };

        let meta = DETAIL_KEYS
            .iter()
            .filter_map(|key| record.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();

        filtered.push(PendingFrame {
            time_micros,
            event: record
                .get("event")
                .and_then(Value::as_str)
                .map(str::to_string),
            job: record.get("job").and_then(Value::as_i64),
            cf_name,
            lsm_state: normalize_levels(state, max_levels),
            meta,
        });
    }

    filtered.sort_by_key(|pending| pending.time_micros);

    let first_time = filtered.first().map(|pending| pending.time_micros).unwrap_or(0);
    let mut state_by_cf: HashMap<String, Vec<i64>> = HashMap::new();
    let mut cf_names: BTreeSet<String> = BTreeSet::new();
    let mut frames = Vec::with_capacity(filtered.len());

    for pending in filtered {
        cf_names.insert(pending.cf_name.clone());
        state_by_cf.insert(pending.cf_name.clone(), pending.lsm_state.clone());

        let left_state = tracked_state(&state_by_cf, &options.left_name, max_levels);
        let right_state = tracked_state(&state_by_cf, &options.right_name, max_levels);

        frames.push(LsmFrame {
            time_micros: pending.time_micros,
            t_rel_ms: (pending.time_micros - first_time) as f64 / 1000.0,
            event: pending.event,
            job: pending.job,
            cf_name: pending.cf_name,
            lsm_state: pending.lsm_state,
            left_state,
            right_state,
            meta: pending.meta,
        });
    }

    debug!(
        "reconstructed {} frames across {} column families",
        frames.len(),
        cf_names.len()
    );

    LsmData {
        meta: LsmMeta {
            left_name: options.left_name.clone(),
            right_name: options.right_name.clone(),
            max_levels,
            frame_count: frames.len(),
            cf_names: cf_names.into_iter().collect(),
        },
        frames,
    }
}

/// Accept integer-or-float JSON times; the engine writes integers
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Latest known state of a tracked column family, zero-filled before any
/// observation
fn tracked_state(
    state_by_cf: &HashMap<String, Vec<i64>>,
    name: &str,
    max_levels: usize,
) -> Vec<i64> {
    state_by_cf
        .get(name)
        .cloned()
        .unwrap_or_else(|| vec![0; max_levels])
}

/// Normalize a state array to exactly `max_levels` entries
///
/// Shorter arrays are right-padded with zeros, longer ones lose their
/// trailing extras.
fn normalize_levels(values: &[Value], max_levels: usize) -> Vec<i64> {
    let mut levels: Vec<i64> = values
        .iter()
        .take(max_levels)
        .map(|value| {
            value
                .as_i64()
                .or_else(|| value.as_f64().map(|f| f as i64))
                .unwrap_or(0)
        })
        .collect();
    levels.resize(max_levels, 0);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> crate::parser::event_log::StructuredRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test records must be objects"),
        }
    }

    fn scanned_from(values: Vec<Value>) -> ScannedLog {
        let mut scanned = ScannedLog::default();
        for value in values {
            let rec = record(value);
            if let (Some(job), Some(cf)) = (
                rec.get("job").and_then(Value::as_i64),
                rec.get("cf_name").and_then(Value::as_str).filter(|s| !s.is_empty()),
            ) {
                scanned.job_to_cf.insert(job, cf.to_string());
            }
            if let Some(state) = rec.get("lsm_state").and_then(Value::as_array) {
                scanned.detected_max_levels = scanned.detected_max_levels.max(state.len());
            }
            scanned.records.push(rec);
        }
        scanned
    }

    fn options(left: &str, right: &str, max_levels: Option<usize>) -> LsmOptions {
        LsmOptions {
            left_name: left.to_string(),
            right_name: right.to_string(),
            max_levels,
        }
    }

    #[test]
    fn test_normalize_pads_and_truncates() {
        assert_eq!(normalize_levels(&[json!(3), json!(1)], 4), vec![3, 1, 0, 0]);
        assert_eq!(
            normalize_levels(&[json!(1), json!(2), json!(3), json!(4)], 2),
            vec![1, 2]
        );
    }

    #[test]
    fn test_every_frame_has_exactly_max_levels_entries() {
        let scanned = scanned_from(vec![
            json!({"cf_name": "a", "time_micros": 10, "lsm_state": [1]}),
            json!({"cf_name": "a", "time_micros": 20, "lsm_state": [1, 2, 3, 4, 5, 6, 7, 8, 9]}),
        ]);
        let data = reconstruct_lsm(&scanned, &options("a", "b", Some(3)));
        assert_eq!(data.meta.max_levels, 3);
        for frame in &data.frames {
            assert_eq!(frame.lsm_state.len(), 3);
            assert_eq!(frame.left_state.len(), 3);
            assert_eq!(frame.right_state.len(), 3);
        }
    }

    #[test]
    fn test_max_levels_detected_from_log() {
        let scanned = scanned_from(vec![json!({
            "cf_name": "a", "time_micros": 10, "lsm_state": [1, 0, 2]
        })]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        assert_eq!(data.meta.max_levels, 3);
    }

    #[test]
    fn test_max_levels_defaults_without_observations() {
        let scanned = scanned_from(vec![json!({"job": 1, "cf_name": "a"})]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        assert_eq!(data.meta.max_levels, DEFAULT_MAX_LEVELS);
        assert!(data.frames.is_empty());
    }

    #[test]
    fn test_frames_sorted_by_time_stable() {
        let scanned = scanned_from(vec![
            json!({"cf_name": "b", "time_micros": 30, "lsm_state": [3]}),
            json!({"cf_name": "a", "time_micros": 10, "lsm_state": [1]}),
            json!({"cf_name": "c", "time_micros": 10, "lsm_state": [2]}),
        ]);
        let data = reconstruct_lsm(&scanned, &options("a", "b", Some(1)));
        let order: Vec<(&str, i64)> = data
            .frames
            .iter()
            .map(|f| (f.cf_name.as_str(), f.time_micros))
            .collect();
        // Stable on the tie at t=10: "a" appeared before "c" in the log
        assert_eq!(order, vec![("a", 10), ("c", 10), ("b", 30)]);
        assert_eq!(data.frames[0].t_rel_ms, 0.0);
        assert_eq!(data.frames[2].t_rel_ms, 0.02);
    }

    #[test]
    fn test_carry_forward_zero_before_observation() {
        let scanned = scanned_from(vec![
            json!({"cf_name": "other", "time_micros": 10, "lsm_state": [5, 5]}),
            json!({"cf_name": "left-records", "time_micros": 20, "lsm_state": [1, 2]}),
            json!({"cf_name": "other", "time_micros": 30, "lsm_state": [6, 6]}),
        ]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        assert_eq!(data.frames[0].left_state, vec![0, 0]);
        assert_eq!(data.frames[1].left_state, vec![1, 2]);
        // Still [1, 2] at the later frame for the other family
        assert_eq!(data.frames[2].left_state, vec![1, 2]);
        assert_eq!(data.frames[2].right_state, vec![0, 0]);
    }

    #[test]
    fn test_cf_resolution_via_job_mapping() {
        let scanned = scanned_from(vec![
            json!({"job": 7, "cf_name": "default", "time_micros": 10, "lsm_state": [1]}),
            json!({"job": 7, "time_micros": 20, "lsm_state": [2]}),
        ]);
        let data = reconstruct_lsm(&scanned, &options("default", "x", Some(1)));
        assert_eq!(data.frames.len(), 2);
        assert_eq!(data.frames[1].cf_name, "default");
    }

    #[test]
    fn test_unresolvable_records_dropped() {
        let scanned = scanned_from(vec![
            json!({"time_micros": 10, "lsm_state": [1]}),
            json!({"cf_name": "a", "lsm_state": [1]}),
            json!({"cf_name": "a", "time_micros": 10}),
        ]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        assert!(data.frames.is_empty());
        assert_eq!(data.meta.frame_count, 0);
    }

    #[test]
    fn test_cf_names_sorted() {
        let scanned = scanned_from(vec![
            json!({"cf_name": "zeta", "time_micros": 10, "lsm_state": [1]}),
            json!({"cf_name": "alpha", "time_micros": 20, "lsm_state": [1]}),
        ]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        assert_eq!(data.meta.cf_names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_meta_copies_detail_keys_only() {
        let scanned = scanned_from(vec![json!({
            "cf_name": "a",
            "time_micros": 10,
            "lsm_state": [1],
            "event": "compaction_finished",
            "compaction_reason": "LevelMaxLevelSize",
            "output_level": 2,
            "unrelated_field": true
        })]);
        let data = reconstruct_lsm(&scanned, &LsmOptions::default());
        let meta = &data.frames[0].meta;
        assert_eq!(meta["compaction_reason"], json!("LevelMaxLevelSize"));
        assert_eq!(meta["output_level"], json!(2));
        assert!(!meta.contains_key("unrelated_field"));
        assert_eq!(data.frames[0].event.as_deref(), Some("compaction_finished"));
    }
}
