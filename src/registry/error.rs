use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize model bundle: {reason}")]
    Serialization { reason: String },

    /// Bundle file bytes are not a readable bundle.
    #[error("corrupted model bundle: {reason}")]
    Corrupted { reason: String },

    /// Bundle was written by an incompatible format version.
    #[error("model bundle format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("training failed: {reason}")]
    Training { reason: String },

    #[error("background task failed: {reason}")]
    TaskFailed { reason: String },
}
