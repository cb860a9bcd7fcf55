//! Error types for the Fusion language server
//!
//! Completion itself never fails: unmatched patterns and unknown names simply
//! produce no items. Errors only arise while loading the API dump or reading
//! configuration, and are surfaced through [`FusionError`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    /// The API dump could not be downloaded.
    #[error("failed to fetch API dump from {url}: {message}")]
    Fetch { url: String, message: String },

    /// The API dump file could not be read.
    #[error("failed to read API dump at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The API dump was not valid JSON or did not have the expected shape.
    #[error("malformed API dump: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type FusionResult<T> = Result<T, FusionError>;
