//! Structured-record extraction from raw log lines.
//!
//! Engine logs embed JSON records after a fixed `EVENT_LOG_v1` marker.
//! A decode failure discards that one line; the scan never aborts on
//! malformed input. The scanner also builds the incremental job-id to
//! column-family mapping, since log producers report the column family only
//! on the first event of a job.

use crate::utils::config::EVENT_LOG_MARKER;
use crate::utils::error::LogError;
use crate::utils::io::lossy_lines;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// One embedded record, as decoded key/value pairs
pub type StructuredRecord = serde_json::Map<String, serde_json::Value>;

/// Result of scanning one log file for structured records
#[derive(Debug, Default)]
pub struct ScannedLog {
    /// Records in order of appearance
    pub records: Vec<StructuredRecord>,

    /// Incremental job id -> column family mapping
    pub job_to_cf: HashMap<i64, String>,

    /// Longest `lsm_state` array observed (0 when none seen)
    pub detected_max_levels: usize,
}

impl ScannedLog {
    /// Resolve a record's column family, directly or via the job mapping
    pub fn resolve_cf_name(&self, record: &StructuredRecord) -> Option<String> {
        if let Some(name) = cf_name_of(record) {
            return Some(name.to_string());
        }
        job_of(record).and_then(|job| self.job_to_cf.get(&job).cloned())
    }
}

fn job_of(record: &StructuredRecord) -> Option<i64> {
    record.get("job").and_then(serde_json::Value::as_i64)
}

fn cf_name_of(record: &StructuredRecord) -> Option<&str> {
    record
        .get("cf_name")
        .and_then(serde_json::Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Scan a log file for embedded structured records
///
/// **Public** - first stage of the pipeline
///
/// # Errors
/// * `LogError::NotFound` - the log file does not exist (fatal for the run)
/// * `LogError::Io` - the file could not be read
pub fn scan_log(path: &Path) -> Result<ScannedLog, LogError> {
    if !path.exists() {
        return Err(LogError::NotFound(path.to_path_buf()));
    }

    let mut scanned = ScannedLog::default();

    for line in lossy_lines(path)? {
        let line = line?;
        let Some(marker_idx) = line.find(EVENT_LOG_MARKER) else {
            continue;
        };
        let Some(brace_idx) = line[marker_idx..].find('{').map(|i| marker_idx + i) else {
            continue;
        };
        let payload = line[brace_idx..].trim();
        let record: StructuredRecord = match serde_json::from_str(payload) {
            Ok(record) => record,
            Err(e) => {
                debug!("discarding undecodable event record: {}", e);
                continue;
            }
        };

        if let (Some(job), Some(cf_name)) = (job_of(&record), cf_name_of(&record)) {
            scanned.job_to_cf.insert(job, cf_name.to_string());
        }

        if let Some(state) = record.get("lsm_state").and_then(serde_json::Value::as_array) {
            scanned.detected_max_levels = scanned.detected_max_levels.max(state.len());
        }

        scanned.records.push(record);
    }

    debug!(
        "scanned {} structured records, {} job mappings",
        scanned.records.len(),
        scanned.job_to_cf.len()
    );

    Ok(scanned)
}
