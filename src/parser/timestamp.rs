//! Timestamp parsing for the two fixed input formats.
//!
//! The log prefix (`2024/01/02-03:04:05.123456`) and the CSV column
//! (`2024-01-02 03:04:05`) come from independent clocks and are never
//! interchanged. Both map onto absolute epoch microseconds; absence of a
//! prefix is a normal outcome for continuation lines, never an error.

use crate::utils::config::{CSV_TS_FORMAT, LOG_TS_FORMAT};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

static LOG_PREFIX_RE: OnceLock<Regex> = OnceLock::new();

fn log_prefix_re() -> &'static Regex {
    LOG_PREFIX_RE.get_or_init(|| {
        Regex::new(r"^\d{4}/\d{2}/\d{2}-\d{2}:\d{2}:\d{2}\.\d+")
            .expect("valid log timestamp prefix regex")
    })
}

/// Check whether a line begins with the log timestamp prefix
pub fn matches_log_prefix(line: &str) -> bool {
    log_prefix_re().is_match(line)
}

/// Parse the log timestamp prefix of a line into epoch microseconds
///
/// Returns `None` when the prefix is absent or malformed. Timestamps are
/// interpreted as UTC; both time domains get the same interpretation, so
/// cross-domain offsets are unaffected.
pub fn parse_log_timestamp(line: &str) -> Option<i64> {
    let prefix = log_prefix_re().find(line)?.as_str();
    let dt = NaiveDateTime::parse_from_str(prefix, LOG_TS_FORMAT).ok()?;
    Some(dt.and_utc().timestamp_micros())
}

/// Parse a CSV timestamp cell (second precision) into epoch microseconds
pub fn parse_csv_timestamp(text: &str) -> Option<i64> {
    let dt = NaiveDateTime::parse_from_str(text, CSV_TS_FORMAT).ok()?;
    Some(dt.and_utc().timestamp_micros())
}
