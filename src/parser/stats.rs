//! Periodic statistics block scanning.
//!
//! A `STATISTICS:` line opens a dump; subsequent `rocksdb.`-prefixed lines
//! are matched against the histogram pattern first, then the counter
//! pattern (first match wins). A fresh timestamped line closes the dump.

use crate::parser::numeric::parse_number;
use crate::parser::schema::{HistogramSummary, StatisticsDump, StatsData, StatsMeta};
use crate::parser::timestamp::{matches_log_prefix, parse_log_timestamp};
use crate::utils::config::{METRIC_PREFIX, STATISTICS_MARKER};
use crate::utils::error::LogError;
use crate::utils::io::lossy_lines;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

/// Scanner state: outside any block, or inside one with the record so far
enum ScanState {
    Idle,
    InDump(StatisticsDump),
}

/// Line-by-line scanner for statistics blocks
pub struct DumpScanner {
    state: ScanState,
    dumps: Vec<StatisticsDump>,
    hist_re: Regex,
    count_re: Regex,
}

impl Default for DumpScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpScanner {
    pub fn new() -> Self {
        let hist_re = Regex::new(concat!(
            r"^(?P<name>rocksdb\.[^ ]+) P50 : (?P<p50>[-0-9.]+) ",
            r"P95 : (?P<p95>[-0-9.]+) P99 : (?P<p99>[-0-9.]+) ",
            r"P100 : (?P<p100>[-0-9.]+) COUNT : (?P<count>[-0-9.]+) SUM : (?P<sum>[-0-9.]+)",
        ))
        .expect("valid histogram line regex");
        let count_re = Regex::new(r"^(?P<name>rocksdb\.[^ ]+) COUNT : (?P<count>[-0-9.]+)")
            .expect("valid counter line regex");
        Self {
            state: ScanState::Idle,
            dumps: Vec::new(),
            hist_re,
            count_re,
        }
    }

    /// Feed one raw log line to the scanner
    pub fn push_line(&mut self, line: &str) {
        if line.contains(STATISTICS_MARKER) {
            self.close_current();
            self.state = ScanState::InDump(StatisticsDump {
                time_micros: parse_log_timestamp(line.trim()),
                t_rel_ms: None,
                counters: BTreeMap::new(),
                histograms: BTreeMap::new(),
            });
            return;
        }

        if matches!(self.state, ScanState::Idle) {
            return;
        }

        let stripped = line.trim();
        if stripped.is_empty() {
            return;
        }
        if matches_log_prefix(stripped) {
            // A fresh timestamped line means the block is over
            self.close_current();
            return;
        }
        if !stripped.starts_with(METRIC_PREFIX) {
            return;
        }

        let ScanState::InDump(dump) = &mut self.state else {
            return;
        };

        // Ordered matchers, histogram first: a histogram line also matches
        // the counter pattern's shorter prefix
        if let Some(caps) = self.hist_re.captures(stripped) {
            dump.histograms.insert(
                caps["name"].to_string(),
                HistogramSummary {
                    p50: parse_number(&caps["p50"]),
                    p95: parse_number(&caps["p95"]),
                    p99: parse_number(&caps["p99"]),
                    p100: parse_number(&caps["p100"]),
                    count: parse_number(&caps["count"]),
                    sum: parse_number(&caps["sum"]),
                },
            );
            return;
        }
        if let Some(caps) = self.count_re.captures(stripped) {
            dump.counters
                .insert(caps["name"].to_string(), parse_number(&caps["count"]));
        }
        // Anything else under the metric prefix is ignored
    }

    fn close_current(&mut self) {
        if let ScanState::InDump(dump) = std::mem::replace(&mut self.state, ScanState::Idle) {
            self.dumps.push(dump);
        }
    }

    /// Close any open dump and compute relative times.
    ///
    /// The reference is the first dump with a non-null timestamp; dumps
    /// whose own timestamp is null keep a null relative time.
    pub fn finish(mut self) -> StatsData {
        self.close_current();

        if let Some(first_time) = self.dumps.iter().find_map(|dump| dump.time_micros) {
            for dump in &mut self.dumps {
                dump.t_rel_ms = dump
                    .time_micros
                    .map(|t| (t - first_time) as f64 / 1000.0);
            }
        }

        StatsData {
            meta: StatsMeta {
                dump_count: self.dumps.len(),
            },
            dumps: self.dumps,
        }
    }
}

/// Parse all statistics blocks out of a log file
///
/// **Public** - second stage of the pipeline
pub fn parse_stats(path: &Path) -> Result<StatsData, LogError> {
    let mut scanner = DumpScanner::new();
    for line in lossy_lines(path)? {
        scanner.push_line(&line?);
    }
    let stats = scanner.finish();
    debug!("parsed {} statistics dumps", stats.meta.dump_count);
    Ok(stats)
}
