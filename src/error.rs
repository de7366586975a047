//! Errors from loading and saving persisted camera data.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing persisted settings and camera state.
///
/// Individual malformed fields are not errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum CamError {
    /// The settings file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML.
    #[error("malformed settings document: {0}")]
    Parse(#[from] toml::de::Error),
    /// The data could not be written as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
