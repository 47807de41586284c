//! Cross-clock alignment and marker construction.
//!
//! The log and the metric CSVs are captured on independent clocks. A single
//! scalar offset maps log-domain times onto the CSV clock; markers then
//! cross-reference events and dumps to the nearest LSM frame by index.

use crate::parser::schema::{LsmFrame, Marker, Series, StatisticsDump};
use log::debug;

/// Marker-worthy event tags and their display labels, in match order
const MARKER_EVENTS: &[(&str, &str)] = &[
    ("flush_started", "Flush start"),
    ("flush_finished", "Flush end"),
    ("compaction_started", "Compaction start"),
    ("compaction_finished", "Compaction end"),
];

/// Compute the scalar offset mapping log-domain times onto the CSV clock
///
/// **Public** - applied to every marker time
///
/// CSV reference: the earliest first point across both series. Log
/// reference: the first statistics dump's time when it has one, else the
/// first LSM frame's time. Either reference missing yields zero.
pub fn compute_time_offset(
    throughput: &Series,
    hit_ratio: &Series,
    dumps: &[StatisticsDump],
    frames: &[LsmFrame],
) -> i64 {
    let csv_ref = [throughput, hit_ratio]
        .iter()
        .filter_map(|series| series.points.first().map(|point| point.time_micros))
        .min();

    let log_ref = dumps
        .first()
        .and_then(|dump| dump.time_micros)
        .or_else(|| frames.first().map(|frame| frame.time_micros));

    match (csv_ref, log_ref) {
        (Some(csv_time), Some(log_time)) => csv_time - log_time,
        _ => {
            debug!("missing clock reference, using zero offset");
            0
        }
    }
}

/// Index of the frame temporally nearest to `target_time`
///
/// **Public** - used for dump markers; binary search over ascending frame
/// times. An exact midpoint resolves to the earlier frame. `None` only when
/// no frames exist.
pub fn nearest_frame_index(times: &[i64], target_time: i64) -> Option<usize> {
    if times.is_empty() {
        return None;
    }
    let idx = times.partition_point(|&t| t < target_time);
    if idx == 0 {
        return Some(0);
    }
    if idx >= times.len() {
        return Some(times.len() - 1);
    }
    let before = times[idx - 1];
    let after = times[idx];
    if target_time - before <= after - target_time {
        Some(idx - 1)
    } else {
        Some(idx)
    }
}

/// Build the unified, time-sorted marker list
///
/// **Public** - flush/compaction frames point at themselves; statistics
/// dumps point at their nearest frame. All times are offset-adjusted.
pub fn build_markers(
    frames: &[LsmFrame],
    dumps: &[StatisticsDump],
    time_offset_micros: i64,
) -> Vec<Marker> {
    let frame_times: Vec<i64> = frames.iter().map(|frame| frame.time_micros).collect();
    let mut markers = Vec::new();

    for (index, frame) in frames.iter().enumerate() {
        let Some(event) = frame.event.as_deref() else {
            continue;
        };
        let Some(label) = marker_label(event) else {
            continue;
        };
        markers.push(Marker {
            time_micros: frame.time_micros + time_offset_micros,
            event: event.to_string(),
            label: label.to_string(),
            lsm_index: Some(index),
        });
    }

    for dump in dumps {
        let Some(time_micros) = dump.time_micros else {
            continue;
        };
        markers.push(Marker {
            time_micros: time_micros + time_offset_micros,
            event: "stats_dump".to_string(),
            label: "Stats dump".to_string(),
            lsm_index: nearest_frame_index(&frame_times, time_micros),
        });
    }

    markers.sort_by_key(|marker| marker.time_micros);
    markers
}

fn marker_label(event: &str) -> Option<&'static str> {
    MARKER_EVENTS
        .iter()
        .find(|(tag, _)| *tag == event)
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::SeriesPoint;
    use std::collections::BTreeMap;

    fn series(times: &[i64]) -> Series {
        Series {
            label: String::new(),
            points: times
                .iter()
                .map(|&time_micros| SeriesPoint {
                    time_micros,
                    value: 1.0,
                })
                .collect(),
        }
    }

    fn frame(time_micros: i64, event: Option<&str>) -> LsmFrame {
        LsmFrame {
            time_micros,
            t_rel_ms: 0.0,
            event: event.map(str::to_string),
            job: None,
            cf_name: "default".to_string(),
            lsm_state: vec![0],
            left_state: vec![0],
            right_state: vec![0],
            meta: serde_json::Map::new(),
        }
    }

    fn dump(time_micros: Option<i64>) -> StatisticsDump {
        StatisticsDump {
            time_micros,
            t_rel_ms: None,
            counters: BTreeMap::new(),
            histograms: BTreeMap::new(),
        }
    }

    #[test]
    fn test_offset_is_csv_minus_log() {
        let offset = compute_time_offset(
            &series(&[1_500]),
            &series(&[1_200]),
            &[dump(Some(1_000))],
            &[frame(900, None)],
        );
        // Earliest CSV point (1200) minus first dump time (1000)
        assert_eq!(offset, 200);
    }

    #[test]
    fn test_offset_falls_back_to_first_frame() {
        let offset =
            compute_time_offset(&series(&[1_500]), &series(&[]), &[], &[frame(1_000, None)]);
        assert_eq!(offset, 500);
    }

    #[test]
    fn test_offset_skips_untimestamped_first_dump() {
        let offset = compute_time_offset(
            &series(&[1_500]),
            &series(&[]),
            &[dump(None)],
            &[frame(1_000, None)],
        );
        assert_eq!(offset, 500);
    }

    #[test]
    fn test_offset_zero_when_reference_missing() {
        assert_eq!(
            compute_time_offset(&series(&[]), &series(&[]), &[dump(Some(1))], &[]),
            0
        );
        assert_eq!(
            compute_time_offset(&series(&[5]), &series(&[]), &[], &[]),
            0
        );
    }

    #[test]
    fn test_nearest_index_basics() {
        let times = [100, 200, 300];
        assert_eq!(nearest_frame_index(&times, 50), Some(0));
        assert_eq!(nearest_frame_index(&times, 100), Some(0));
        assert_eq!(nearest_frame_index(&times, 290), Some(2));
        assert_eq!(nearest_frame_index(&times, 1_000), Some(2));
        assert_eq!(nearest_frame_index(&[], 100), None);
    }

    #[test]
    fn test_nearest_index_midpoint_prefers_earlier() {
        assert_eq!(nearest_frame_index(&[100, 200], 150), Some(0));
        assert_eq!(nearest_frame_index(&[100, 200], 151), Some(1));
    }

    #[test]
    fn test_markers_for_flush_and_compaction_only() {
        let frames = vec![
            frame(100, Some("flush_started")),
            frame(200, Some("table_file_creation")),
            frame(300, Some("compaction_finished")),
            frame(400, None),
        ];
        let markers = build_markers(&frames, &[], 0);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "Flush start");
        assert_eq!(markers[0].lsm_index, Some(0));
        assert_eq!(markers[1].label, "Compaction end");
        assert_eq!(markers[1].lsm_index, Some(2));
    }

    #[test]
    fn test_dump_markers_reference_nearest_frame() {
        let frames = vec![frame(100, None), frame(200, None)];
        let markers = build_markers(&frames, &[dump(Some(150)), dump(Some(190)), dump(None)], 0);
        assert_eq!(markers.len(), 2);
        // Midpoint resolves to the earlier frame
        assert_eq!(markers[0].lsm_index, Some(0));
        assert_eq!(markers[1].lsm_index, Some(1));
    }

    #[test]
    fn test_markers_sorted_by_adjusted_time() {
        let frames = vec![
            frame(300, Some("flush_started")),
            frame(100, Some("flush_finished")),
        ];
        let markers = build_markers(&frames, &[dump(Some(200))], 1_000);
        let times: Vec<i64> = markers.iter().map(|m| m.time_micros).collect();
        assert_eq!(times, vec![1_100, 1_200, 1_300]);
        assert!(markers.windows(2).all(|w| w[0].time_micros <= w[1].time_micros));
    }

    #[test]
    fn test_dump_marker_with_no_frames_has_null_index() {
        let markers = build_markers(&[], &[dump(Some(100))], 0);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].lsm_index, None);
    }
}
