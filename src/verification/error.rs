use thiserror::Error;

use crate::embedding::Modality;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    /// Embeddings are not comparable; no score is computed.
    #[error(
        "{modality} embeddings are not comparable: expected dimension {expected}, got {left} and {right}"
    )]
    DimensionMismatch {
        modality: Modality,
        expected: usize,
        left: usize,
        right: usize,
    },

    #[error("threshold must be a finite number within [0, 1], got {value}")]
    InvalidThreshold { value: f64 },

    #[error("invalid verification config: {reason}")]
    InvalidConfig { reason: String },

    #[error("illegal verification state transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}
