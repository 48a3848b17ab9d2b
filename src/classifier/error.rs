use std::path::PathBuf;

use thiserror::Error;

use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The statistical stage has no usable model bundle.
    #[error("classification model unavailable: {0}")]
    ModelUnavailable(#[from] RegistryError),

    /// The bundle predicted a label that is not a known department.
    #[error("model predicted unknown label '{label}'")]
    LabelDecode { label: String },

    #[error("unknown department '{value}'")]
    UnknownDepartment { value: String },

    #[error("failed to load keyword file {path}: {reason}")]
    KeywordFile { path: PathBuf, reason: String },

    #[error("invalid keyword configuration: {reason}")]
    InvalidKeywords { reason: String },
}
