use std::time::Duration;

use thiserror::Error;

use super::PoolError;
use crate::embedding::{EmbeddingError, ExtractionError};
use crate::transcription::TranscriptionError;
use crate::verification::VerificationError;

/// Every failure a router operation can report. Nothing else crosses the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouterError {
    /// Empty file, empty text, malformed embedding, bad parameter.
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    DimensionMismatch(VerificationError),

    #[error("classification model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl RouterError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Input(_) => "input_error",
            RouterError::Extraction(_) => "extraction_error",
            RouterError::DimensionMismatch(_) => "dimension_mismatch",
            RouterError::ModelUnavailable(_) => "model_unavailable",
            RouterError::Transcription(_) => "transcription_error",
            RouterError::Timeout { .. } => "timeout",
            RouterError::Internal(_) => "internal_error",
        }
    }

    pub(crate) fn from_pool(operation: &'static str, err: PoolError) -> Self {
        match err {
            PoolError::Timeout { after } => RouterError::Timeout { operation, after },
            other => RouterError::Internal(format!("{}: {}", operation, other)),
        }
    }
}

impl From<EmbeddingError> for RouterError {
    fn from(err: EmbeddingError) -> Self {
        RouterError::Input(format!("invalid stored embedding: {}", err))
    }
}

impl From<VerificationError> for RouterError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::DimensionMismatch { .. } => RouterError::DimensionMismatch(err),
            VerificationError::InvalidThreshold { .. } => RouterError::Input(err.to_string()),
            other => RouterError::Internal(other.to_string()),
        }
    }
}
