//! Externally collected metric series.
//!
//! Throughput and block-cache hit-ratio CSVs are captured by a separate
//! collector on its own clock; this module loads them and locates them
//! inside an experiment directory.

pub mod loader;

// Re-export main functions
pub use loader::{discover_csv_files, load_series};
