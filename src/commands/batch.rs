//! Batch command implementation.
//!
//! Enumerates experiment subdirectories under a root, processes each
//! independently, and writes a manifest. One experiment failing leaves its
//! siblings untouched; it is simply absent from the manifest.

use crate::aggregator::LsmOptions;
use crate::commands::experiment::process_experiment;
use crate::output::write_manifest;
use crate::parser::schema::{Manifest, ManifestEntry};
use crate::utils::config::{EXPERIMENT_LOG_INFIX, EXPERIMENT_LOG_PREFIX};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the batch command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct BatchArgs {
    /// Root directory containing one subdirectory per experiment
    pub root: PathBuf,

    /// Directory receiving `data/<name>.json` documents and `index.json`
    pub out_dir: PathBuf,

    /// Reconstruction options (tracked names, level override)
    pub options: LsmOptions,

    /// Pretty-print the output JSON
    pub pretty: bool,
}

/// Execute the batch command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * No experiment with a primary log is discoverable under the root
/// * Manifest write failures
pub fn execute_batch(args: BatchArgs) -> Result<()> {
    let start_time = Instant::now();

    let experiments = find_experiment_logs(&args.root)
        .with_context(|| format!("Failed to enumerate {}", args.root.display()))?;
    if experiments.is_empty() {
        anyhow::bail!("No experiments found under {}", args.root.display());
    }
    info!("Found {} experiments", experiments.len());

    let data_dir = args.out_dir.join("data");
    let mut entries = Vec::new();

    for (name, log_path) in experiments {
        let output_path = data_dir.join(format!("{}.json", name));
        match process_experiment(&name, &log_path, &args.options, &output_path, args.pretty) {
            Ok(()) => entries.push(ManifestEntry {
                file: format!("data/{}.json", name),
                name,
            }),
            Err(e) => {
                // Siblings keep processing; this one is absent from the manifest
                warn!("Skipping experiment {}: {:#}", name, e);
            }
        }
    }

    let manifest = Manifest {
        experiments: entries,
    };
    let manifest_path = args.out_dir.join("index.json");
    write_manifest(&manifest, &manifest_path, args.pretty)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;
    info!("✓ Manifest written to: {}", manifest_path.display());

    info!(
        "Batch completed in {:.2}s ({} documents)",
        start_time.elapsed().as_secs_f64(),
        manifest.experiments.len()
    );
    Ok(())
}

/// Enumerate experiment subdirectories and their primary logs, in name order
///
/// **Public** - a subdirectory without a primary log is skipped with a
/// warning
pub fn find_experiment_logs(root: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    let mut experiments = Vec::new();
    for dir in subdirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        match find_primary_log(&dir)? {
            Some(log_path) => experiments.push((name, log_path)),
            None => warn!("No primary log in {}, skipping", dir.display()),
        }
    }
    Ok(experiments)
}

/// Locate the primary log inside one experiment directory.
///
/// Candidates start with `data_rocksdb`; names carrying `_db_LOG_` are
/// preferred, any name containing `LOG` is the fallback. First in sorted
/// name order wins.
fn find_primary_log(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(EXPERIMENT_LOG_PREFIX))
        })
        .collect();
    files.sort();

    let preferred = files.iter().find(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(EXPERIMENT_LOG_INFIX))
    });
    let fallback = files.iter().find(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains("LOG"))
    });

    Ok(preferred.or(fallback).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_primary_log_prefers_db_log_infix() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("data_rocksdb_aux_LOG_old"), "").unwrap();
        std::fs::write(dir.path().join("data_rocksdb_x_db_LOG_1"), "").unwrap();
        let log = find_primary_log(dir.path()).unwrap().unwrap();
        assert!(log.file_name().unwrap().to_str().unwrap().contains("_db_LOG_"));
    }

    #[test]
    fn test_find_primary_log_fallback() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("data_rocksdbLOG"), "").unwrap();
        std::fs::write(dir.path().join("data_rocksdb_other"), "").unwrap();
        let log = find_primary_log(dir.path()).unwrap().unwrap();
        assert_eq!(log.file_name().unwrap().to_str().unwrap(), "data_rocksdbLOG");
    }

    #[test]
    fn test_find_primary_log_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert!(find_primary_log(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_find_experiment_logs_name_order() {
        let root = tempdir().unwrap();
        for name in ["exp_b", "exp_a", "empty"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        std::fs::write(root.path().join("exp_a/data_rocksdb_db_LOG_1"), "").unwrap();
        std::fs::write(root.path().join("exp_b/data_rocksdb_db_LOG_1"), "").unwrap();

        let experiments = find_experiment_logs(root.path()).unwrap();
        let names: Vec<&str> = experiments.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["exp_a", "exp_b"]);
    }

    #[test]
    fn test_execute_batch_empty_root_is_fatal() {
        let root = tempdir().unwrap();
        let out = tempdir().unwrap();
        let args = BatchArgs {
            root: root.path().to_path_buf(),
            out_dir: out.path().to_path_buf(),
            options: LsmOptions::default(),
            pretty: false,
        };
        assert!(execute_batch(args).is_err());
    }
}
