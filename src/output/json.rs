//! JSON document output writer.
//!
//! Writes ExperimentDocument and Manifest structs to JSON files.

use crate::parser::schema::{ExperimentDocument, Manifest};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an experiment document to a JSON file
///
/// **Public** - main entry point for document output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_document(
    document: &ExperimentDocument,
    output_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), OutputError> {
    write_json(document, output_path.as_ref(), pretty)
}

/// Write a batch manifest to a JSON file
///
/// **Public** - emitted once per batch run, after all documents
pub fn write_manifest(
    manifest: &Manifest,
    output_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), OutputError> {
    write_json(manifest, output_path.as_ref(), pretty)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path, pretty: bool) -> Result<(), OutputError> {
    info!("Writing {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;
    } else {
        serde_json::to_writer(writer, value).map_err(OutputError::SerializationFailed)?;
    }

    Ok(())
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read an experiment document back from a JSON file
///
/// **Public** - used by the validate command and tests
pub fn read_document(input_path: impl AsRef<Path>) -> Result<ExperimentDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading document from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: ExperimentDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(document)
}
