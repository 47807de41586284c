//! Metric CSV loading and discovery.
//!
//! Rows are `timestamp,value[,...]`; extra columns are ignored. Rows that
//! fail timestamp or value coercion are skipped, never fatal. A missing
//! file yields an empty series.

use crate::parser::numeric::parse_series_value;
use crate::parser::schema::{Series, SeriesPoint};
use crate::parser::timestamp::parse_csv_timestamp;
use crate::utils::config::{HIT_RATIO_CSV_HINT, THROUGHPUT_CSV_HINT};
use crate::utils::error::SeriesError;
use crate::utils::io::lossy_lines;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Load a labeled series from a two-column CSV file
///
/// **Public** - `None` yields an empty series (the experiment simply has no
/// collector output)
pub fn load_series(path: Option<&Path>) -> Result<Series, SeriesError> {
    let Some(path) = path else {
        return Ok(Series::default());
    };

    let mut lines = lossy_lines(path)?;
    let mut series = Series::default();

    if let Some(header) = lines.next() {
        let cells = split_csv_line(&header?);
        if cells.len() >= 2 {
            series.label = cells[1].trim().trim_matches('"').to_string();
        }
    }

    let mut skipped = 0usize;
    for line in lines {
        let cells = split_csv_line(&line?);
        if cells.len() < 2 {
            skipped += 1;
            continue;
        }
        let Some(time_micros) = parse_csv_timestamp(cells[0].trim()) else {
            skipped += 1;
            continue;
        };
        let Some(value) = parse_series_value(&cells[1]) else {
            skipped += 1;
            continue;
        };
        series.points.push(SeriesPoint { time_micros, value });
    }

    if skipped > 0 {
        debug!(
            "skipped {} unusable rows in {}",
            skipped,
            path.display()
        );
    }

    series.points.sort_by_key(|point| point.time_micros);
    Ok(series)
}

/// Locate the throughput and hit-ratio CSVs in an experiment directory
///
/// **Public** - filename substring match over `*.csv` entries in sorted
/// name order; first match per kind wins
pub fn discover_csv_files(dir: &Path) -> (Option<PathBuf>, Option<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {}", dir.display(), e);
            return (None, None);
        }
    };

    let mut names: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    names.sort();

    let mut throughput = None;
    let mut hit_ratio = None;
    for path in names {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.contains(THROUGHPUT_CSV_HINT) {
            throughput.get_or_insert(path);
        } else if name.contains(HIT_RATIO_CSV_HINT) {
            hit_ratio.get_or_insert(path);
        }
    }
    (throughput, hit_ratio)
}

/// Split one CSV line, honoring double-quoted fields with `""` escapes.
///
/// The collector quotes values that contain comma grouping, so a naive
/// split would tear them apart.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
