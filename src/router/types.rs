use serde::Serialize;

use crate::classifier::{ClassificationOutcome, Department, RoutedBy};
use crate::embedding::{Embedding, Modality};

pub const TEXT_PROCESSED: &str = "Text query processed successfully.";
pub const FILE_PROCESSED: &str = "File query processed successfully.";
pub const FILE_UNPROCESSED: &str = "Could not process file input.";
pub const EMPTY_TEXT: &str = "Empty text query provided.";
pub const EMPTY_FILE: &str = "Empty file received. Please provide a valid file.";

/// The side of a verification that is not the stored reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Embedding(Embedding),
    /// Raw media, embedded by the modality's extractor first.
    Media(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    pub modality: Modality,
    pub probe: Probe,
    pub stored: Embedding,
    pub threshold: Option<f64>,
}

/// Uniform classification response.
///
/// `transcribed_text` is what the caller sent or what was transcribed, and
/// `normalized_text` what the classifier saw. Both are `None`, together with
/// `department`, only for the "could not process" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub transcribed_text: Option<String>,
    pub normalized_text: Option<String>,
    pub department: Option<Department>,
    pub routed_by: Option<RoutedBy>,
    pub message: String,
}

impl ClassificationResult {
    pub fn classified(
        text: impl Into<String>,
        outcome: ClassificationOutcome,
        message: &str,
    ) -> Self {
        Self {
            transcribed_text: Some(text.into()),
            routed_by: Some(outcome.stage.routed_by()),
            normalized_text: Some(outcome.normalized_text),
            department: Some(outcome.department),
            message: message.to_string(),
        }
    }

    /// Transcription heard nothing; not an error.
    pub fn unprocessed() -> Self {
        Self {
            transcribed_text: None,
            normalized_text: None,
            department: None,
            routed_by: None,
            message: FILE_UNPROCESSED.to_string(),
        }
    }

    pub fn is_processed(&self) -> bool {
        self.department.is_some()
    }
}
