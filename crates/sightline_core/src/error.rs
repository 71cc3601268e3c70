//! Error types for Sightline's storage and configuration surfaces
//!
//! Overlay positioning and grid fitting never fail; only loading and saving
//! persisted state does.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by stores and configuration loading
#[derive(Error, Debug)]
pub enum SightlineError {
    /// Failed to read or write a file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A store file exists but does not hold a JSON object
    #[error("Store file {0} is not a JSON object")]
    InvalidStoreFormat(PathBuf),
}

impl SightlineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for Sightline operations
pub type Result<T> = std::result::Result<T, SightlineError>;
