//! Log and metric parsing.
//!
//! This module handles:
//! - Parsing the two fixed timestamp formats (log prefix and CSV)
//! - Coercing free-text numeric tokens
//! - Extracting embedded structured records from log lines
//! - Scanning periodic statistics blocks
//! - Defining the output document schema

pub mod event_log;
pub mod numeric;
pub mod schema;
pub mod stats;
pub mod timestamp;

// Re-export main types
pub use event_log::{scan_log, ScannedLog, StructuredRecord};
pub use numeric::{parse_number, parse_series_value, Number};
pub use schema::{
    ExperimentDocument, ExperimentInfo, HistogramSummary, LsmData, LsmFrame, LsmMeta, Manifest,
    ManifestEntry, Marker, MarkerData, Series, SeriesBundle, SeriesPoint, StatisticsDump,
    StatsData, StatsMeta,
};
pub use stats::parse_stats;
pub use timestamp::{matches_log_prefix, parse_csv_timestamp, parse_log_timestamp};
