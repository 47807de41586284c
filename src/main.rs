//! LSM Timeline CLI
//!
//! Reconstructs time-aligned timelines of RocksDB LSM state and statistics
//! from engine LOG files, emitting JSON documents for visualization.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use lsm_timeline::aggregator::LsmOptions;
use lsm_timeline::commands::analyze::{execute_analyze, validate_args, AnalyzeArgs};
use lsm_timeline::commands::batch::{execute_batch, BatchArgs};
use lsm_timeline::utils::config::{DEFAULT_LEFT_CF, DEFAULT_RIGHT_CF};

/// LSM Timeline - RocksDB experiment timeline reconstruction
#[derive(Parser, Debug)]
#[command(name = "lsm-timeline")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a single engine log file
    Analyze {
        /// Path to the engine LOG file
        #[arg(short, long)]
        log: PathBuf,

        /// Output directory for the generated document
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Column family name for the left panel
        #[arg(long, default_value = DEFAULT_LEFT_CF)]
        left_name: String,

        /// Column family name for the right panel
        #[arg(long, default_value = DEFAULT_RIGHT_CF)]
        right_name: String,

        /// Override max LSM levels (auto-detect if omitted)
        #[arg(long)]
        max_levels: Option<usize>,

        /// Pretty-print output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Process a root folder of experiment subfolders and emit a manifest
    Batch {
        /// Root folder containing experiment subfolders with data_rocksdb* LOG files
        #[arg(short, long)]
        root: PathBuf,

        /// Output directory for documents and the manifest
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Column family name for the left panel
        #[arg(long, default_value = DEFAULT_LEFT_CF)]
        left_name: String,

        /// Column family name for the right panel
        #[arg(long, default_value = DEFAULT_RIGHT_CF)]
        right_name: String,

        /// Override max LSM levels (auto-detect if omitted)
        #[arg(long)]
        max_levels: Option<usize>,

        /// Pretty-print output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a generated document JSON file
    Validate {
        /// Path to a document JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            log,
            out,
            left_name,
            right_name,
            max_levels,
            pretty,
        } => {
            let args = AnalyzeArgs {
                log_path: log,
                out_dir: out,
                options: LsmOptions {
                    left_name,
                    right_name,
                    max_levels,
                },
                pretty,
            };
            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Batch {
            root,
            out,
            left_name,
            right_name,
            max_levels,
            pretty,
        } => {
            execute_batch(BatchArgs {
                root,
                out_dir: out,
                options: LsmOptions {
                    left_name,
                    right_name,
                    max_levels,
                },
                pretty,
            })?;
        }

        Commands::Validate { file } => {
            validate_document_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a generated document JSON file
///
/// **Private** - internal command implementation
fn validate_document_file(file_path: PathBuf) -> Result<()> {
    use lsm_timeline::output::read_document;

    println!("Validating document: {}", file_path.display());

    let document = read_document(&file_path)?;

    println!("✓ Valid document JSON");
    println!("  Experiment: {}", document.experiment.name);
    println!("  Frames: {}", document.lsm.meta.frame_count);
    println!("  Dumps: {}", document.stats.meta.dump_count);
    println!(
        "  Series points: {} throughput / {} hit ratio",
        document.series.throughput.points.len(),
        document.series.block_cache_hit_ratio.points.len()
    );
    println!("  Markers: {}", document.markers.items.len());
    println!("  Time offset: {} us", document.markers.time_offset_micros);

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("LSM Timeline v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Timeline reconstruction of RocksDB LSM state and statistics from LOG files.");
}
