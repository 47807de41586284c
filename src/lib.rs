//! LSM Timeline
//!
//! Reconstructs a time-aligned timeline of RocksDB internal state
//! from raw engine LOG files and externally collected metric CSVs.
//!
//! This crate provides the core implementation for the
//! `lsm-timeline` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! lsm-timeline analyze --log path/to/LOG
//! lsm-timeline batch --root path/to/experiments
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod series;
pub mod utils;
