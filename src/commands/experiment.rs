//! Single-experiment pipeline.
//!
//! One experiment runs:
//! 1. Scan the log for structured records
//! 2. Reconstruct the LSM frame sequence
//! 3. Parse the statistics dumps
//! 4. Discover and load the metric CSVs
//! 5. Compute the clock offset and build markers
//! 6. Assemble the document

use crate::aggregator::{build_markers, compute_time_offset, reconstruct_lsm, LsmOptions};
use crate::output::write_document;
use crate::parser::schema::{ExperimentDocument, ExperimentInfo, MarkerData, SeriesBundle};
use crate::parser::{parse_stats, scan_log};
use crate::series::{discover_csv_files, load_series};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

/// Run the pipeline for one experiment and assemble its document
///
/// **Public** - shared by the analyze and batch commands
///
/// # Errors
/// A missing log file is fatal for this experiment; per-line problems are
/// absorbed upstream.
pub fn build_document(
    name: &str,
    log_path: &Path,
    options: &LsmOptions,
) -> Result<ExperimentDocument> {
    info!("Processing experiment: {}", name);

    let scanned = scan_log(log_path)
        .with_context(|| format!("Failed to scan log {}", log_path.display()))?;
    let lsm = reconstruct_lsm(&scanned, options);
    debug!("{} frames, {} column families", lsm.meta.frame_count, lsm.meta.cf_names.len());

    let stats = parse_stats(log_path)
        .with_context(|| format!("Failed to parse statistics in {}", log_path.display()))?;
    debug!("{} statistics dumps", stats.meta.dump_count);

    // parent() of a bare filename is the empty path, not "."
    let experiment_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let (throughput_csv, hit_ratio_csv) = discover_csv_files(experiment_dir);
    let throughput = load_series(throughput_csv.as_deref())
        .context("Failed to load throughput CSV")?;
    let block_cache_hit_ratio = load_series(hit_ratio_csv.as_deref())
        .context("Failed to load block cache hit ratio CSV")?;

    let time_offset_micros =
        compute_time_offset(&throughput, &block_cache_hit_ratio, &stats.dumps, &lsm.frames);
    let items = build_markers(&lsm.frames, &stats.dumps, time_offset_micros);
    debug!("{} markers, offset {} us", items.len(), time_offset_micros);

    Ok(ExperimentDocument {
        lsm,
        stats,
        series: SeriesBundle {
            throughput,
            block_cache_hit_ratio,
        },
        markers: MarkerData {
            time_offset_micros,
            items,
        },
        experiment: ExperimentInfo {
            name: name.to_string(),
            log_path: log_path.display().to_string(),
            throughput_csv: throughput_csv.map(|p| p.display().to_string()),
            hit_ratio_csv: hit_ratio_csv.map(|p| p.display().to_string()),
        },
    })
}

/// Build one experiment's document and write it out
///
/// **Public** - convenience wrapper used by both commands
pub fn process_experiment(
    name: &str,
    log_path: &Path,
    options: &LsmOptions,
    output_path: &Path,
    pretty: bool,
) -> Result<()> {
    let document = build_document(name, log_path, options)?;
    write_document(&document, output_path, pretty)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!("✓ Document written to: {}", output_path.display());
    Ok(())
}
