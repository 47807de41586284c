//! Analyze command implementation.
//!
//! Runs the full pipeline for a single log file and writes one document.

use crate::aggregator::LsmOptions;
use crate::commands::experiment::process_experiment;
use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the engine log file
    pub log_path: PathBuf,

    /// Directory receiving `data.json`
    pub out_dir: PathBuf,

    /// Reconstruction options (tracked names, level override)
    pub options: LsmOptions,

    /// Pretty-print the output JSON
    pub pretty: bool,
}

/// Validate analyze arguments
///
/// **Public** - called before execute_analyze for early failure
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.options.left_name.is_empty() || args.options.right_name.is_empty() {
        anyhow::bail!("Tracked column family names cannot be empty");
    }
    if args.log_path.as_os_str().is_empty() {
        anyhow::bail!("Log path cannot be empty");
    }
    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * The log file does not exist (fatal for the invocation)
/// * Output write failures
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    let name = args
        .log_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("experiment")
        .to_string();
    let output_path = args.out_dir.join("data.json");

    process_experiment(&name, &args.log_path, &args.options, &output_path, args.pretty)?;

    info!(
        "Analyze completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
