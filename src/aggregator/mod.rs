//! Aggregation of scanned records into timeline data.
//!
//! This module transforms per-line parse results into:
//! - Sorted LSM frame sequences with carry-forward column-family state
//! - The cross-clock offset and unified marker list

pub mod align;
pub mod lsm;

// Re-export main types and functions
pub use align::{build_markers, compute_time_offset, nearest_frame_index};
pub use lsm::{reconstruct_lsm, LsmOptions};
