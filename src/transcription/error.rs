use thiserror::Error;

/// The transcription engine failed outright (as opposed to hearing nothing).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranscriptionError {
    #[error("failed to decode media: {reason}")]
    DecodeFailed { reason: String },

    #[error("transcription engine failed: {reason}")]
    EngineFailed { reason: String },
}
