use thiserror::Error;

use super::Modality;

/// A client-supplied embedding payload is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("embedding is empty")]
    Empty,

    #[error("embedding component {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("malformed embedding payload: {reason}")]
    Malformed { reason: String },
}

/// The extractor could not produce an embedding from the supplied media.
///
/// Raised before any comparison happens; never coerced into a low similarity score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("no face detected in the image")]
    NoFaceDetected,

    #[error("multiple faces detected ({count}); provide an image with a single face")]
    MultipleFacesDetected { count: usize },

    #[error("no usable speech detected in the audio")]
    NoSpeechDetected,

    #[error("{modality} extractor failed: {reason}")]
    ModelFailed { modality: Modality, reason: String },
}
