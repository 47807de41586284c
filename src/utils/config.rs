//! Configuration and constants for the pipeline.

/// Marker token that introduces an embedded structured record in a log line
pub const EVENT_LOG_MARKER: &str = "EVENT_LOG_v1";

/// Marker token that opens a periodic statistics block
pub const STATISTICS_MARKER: &str = "STATISTICS:";

/// Prefix of every metric name inside a statistics block
pub const METRIC_PREFIX: &str = "rocksdb.";

/// Log timestamp prefix format (`2024/01/02-03:04:05.123456`)
pub const LOG_TS_FORMAT: &str = "%Y/%m/%d-%H:%M:%S%.f";

/// CSV timestamp format (`2024-01-02 03:04:05`), second precision
pub const CSV_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of LSM levels when none can be detected from the log
pub const DEFAULT_MAX_LEVELS: usize = 7;

/// Default tracked column family shown in the left panel
pub const DEFAULT_LEFT_CF: &str = "left-records";

/// Default tracked column family shown in the right panel
pub const DEFAULT_RIGHT_CF: &str = "right-records";

/// Filename substring selecting the throughput CSV in an experiment directory
pub const THROUGHPUT_CSV_HINT: &str = "throughput";

/// Filename substring selecting the block-cache hit-ratio CSV
pub const HIT_RATIO_CSV_HINT: &str = "block_cache_hit_ratio";

/// Filename prefix of a primary experiment log
pub const EXPERIMENT_LOG_PREFIX: &str = "data_rocksdb";

/// Preferred infix of a primary experiment log (fallback: any name with `LOG`)
pub const EXPERIMENT_LOG_INFIX: &str = "_db_LOG_";

// Detail fields copied from a structured record into a frame's `meta`.
// Records carry these only on compaction/flush events, and not all at once.
pub const DETAIL_KEYS: &[&str] = &[
    "compaction_reason",
    "output_level",
    "num_output_files",
    "total_output_size",
    "num_input_records",
    "num_output_records",
    "compaction_time_micros",
    "compaction_time_cpu_micros",
    "num_subcompactions",
    "input_data_size",
    "files_L0",
    "files_L1",
    "files_L2",
    "files_L3",
    "score",
    "flush_reason",
    "output_compression",
];
