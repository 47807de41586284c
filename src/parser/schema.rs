//! Output JSON schema definitions for experiment documents.
//!
//! This module defines the structure of the JSON files we write to disk:
//! one document per experiment plus a batch manifest.

use crate::parser::numeric::Number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reconstructed LSM snapshot.
///
/// `left_state` / `right_state` carry the most recent known state of the two
/// tracked column families at this instant (all-zero before any observation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsmFrame {
    /// Absolute epoch microseconds of the source record
    pub time_micros: i64,

    /// Milliseconds relative to the first frame
    pub t_rel_ms: f64,

    /// Event tag of the source record (e.g. `compaction_finished`)
    pub event: Option<String>,

    /// Background job id, when the record carried one
    pub job: Option<i64>,

    /// Column family that changed at this frame
    pub cf_name: String,

    /// Per-level file counts, exactly `max_levels` entries
    pub lsm_state: Vec<i64>,

    /// Carry-forward state of the left tracked column family
    pub left_state: Vec<i64>,

    /// Carry-forward state of the right tracked column family
    pub right_state: Vec<i64>,

    /// Detail fields present on the source record (compaction/flush metadata)
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// Metadata for a reconstructed frame sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsmMeta {
    pub left_name: String,
    pub right_name: String,
    pub max_levels: usize,
    pub frame_count: usize,
    /// Distinct column family names observed, sorted lexicographically
    pub cf_names: Vec<String>,
}

/// Reconstructed LSM timeline for one experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsmData {
    pub meta: LsmMeta,
    pub frames: Vec<LsmFrame>,
}

/// Percentile block of one histogram line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub p50: Option<Number>,
    pub p95: Option<Number>,
    pub p99: Option<Number>,
    pub p100: Option<Number>,
    pub count: Option<Number>,
    pub sum: Option<Number>,
}

/// One periodic statistics block.
///
/// `time_micros` is null when the opening line carried no parseable
/// timestamp; `t_rel_ms` is null alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsDump {
    pub time_micros: Option<i64>,
    pub t_rel_ms: Option<f64>,
    pub counters: BTreeMap<String, Option<Number>>,
    pub histograms: BTreeMap<String, HistogramSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsMeta {
    pub dump_count: usize,
}

/// Statistics dumps for one experiment, in order of appearance in the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsData {
    pub meta: StatsMeta,
    pub dumps: Vec<StatisticsDump>,
}

/// One point of an externally collected metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time_micros: i64,
    pub value: f64,
}

/// A labeled metric series, points sorted ascending by time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

/// The two metric series collected alongside an experiment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub throughput: Series,
    pub block_cache_hit_ratio: Series,
}

/// A timeline marker correlating an event or dump to the nearest LSM frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    /// Offset-adjusted epoch microseconds (CSV clock domain)
    pub time_micros: i64,
    pub event: String,
    pub label: String,
    /// Index into `lsm.frames`; null when no frames exist
    pub lsm_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerData {
    /// Scalar added to log-domain times to map them onto the CSV clock
    pub time_offset_micros: i64,
    pub items: Vec<Marker>,
}

/// Provenance of one experiment's inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentInfo {
    pub name: String,
    pub log_path: String,
    pub throughput_csv: Option<String>,
    pub hit_ratio_csv: Option<String>,
}

/// Top-level document written per experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentDocument {
    pub lsm: LsmData,
    pub stats: StatsData,
    pub series: SeriesBundle,
    pub markers: MarkerData,
    pub experiment: ExperimentInfo,
}

/// One manifest entry of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    /// Document path relative to the manifest's directory
    pub file: String,
}

/// Batch manifest, entries in enumeration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub experiments: Vec<ManifestEntry>,
}
