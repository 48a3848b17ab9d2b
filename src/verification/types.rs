use serde::Serialize;

use super::VerificationError;
use crate::embedding::Modality;

/// Outcome of comparing two embeddings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub modality: Modality,
    pub is_match: bool,
    /// Fused score the decision was made on.
    pub similarity: f64,
    pub cosine: f64,
    pub euclidean: f64,
    pub threshold: f64,
}

impl VerificationResult {
    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        if self.is_match { "MATCH" } else { "NO_MATCH" }
    }

    /// Distance of the fused score from the threshold (negative when rejected).
    pub fn margin(&self) -> f64 {
        self.similarity - self.threshold
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (similarity: {:.4}, threshold: {:.2})",
            self.modality,
            self.debug_status(),
            self.similarity,
            self.threshold
        )
    }
}

/// Lifecycle of one verification request.
///
/// `Idle -> Extracting -> Comparing -> {Decided, Failed}`. Extraction is skipped when
/// the probe is already an embedding, and any non-terminal state may fail. `Decided`
/// and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    Idle,
    Extracting,
    Comparing,
    Decided { similarity: f64, is_match: bool },
    Failed { kind: &'static str, reason: String },
}

impl VerificationState {
    pub fn name(&self) -> &'static str {
        match self {
            VerificationState::Idle => "idle",
            VerificationState::Extracting => "extracting",
            VerificationState::Comparing => "comparing",
            VerificationState::Decided { .. } => "decided",
            VerificationState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationState::Decided { .. } | VerificationState::Failed { .. }
        )
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(self, next: VerificationState) -> Result<VerificationState, VerificationError> {
        use VerificationState::*;

        let allowed = matches!(
            (&self, &next),
            (Idle, Extracting)
                | (Idle, Comparing)
                | (Extracting, Comparing)
                | (Comparing, Decided { .. })
                | (Idle | Extracting | Comparing, Failed { .. })
        );

        if allowed {
            Ok(next)
        } else {
            Err(VerificationError::InvalidTransition {
                from: self.name(),
                to: next.name(),
            })
        }
    }
}
