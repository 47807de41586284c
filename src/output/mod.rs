//! Output writers for experiment documents and the batch manifest.

pub mod json;

// Re-export main functions
pub use json::{read_document, write_document, write_manifest};
