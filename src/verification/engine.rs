use tracing::debug;

use super::metrics::similarity;
use super::{VerificationError, VerificationResult};
use crate::constants::{DEFAULT_FACE_THRESHOLD, DEFAULT_VOICE_THRESHOLD, DimConfig};
use crate::embedding::{Embedding, Modality};

/// Per-modality dimensions and default thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationConfig {
    pub dims: DimConfig,
    pub face_threshold: f64,
    pub voice_threshold: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            dims: DimConfig::default(),
            face_threshold: DEFAULT_FACE_THRESHOLD,
            voice_threshold: DEFAULT_VOICE_THRESHOLD,
        }
    }
}

impl VerificationConfig {
    pub fn threshold_for(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Face => self.face_threshold,
            Modality::Voice => self.voice_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), VerificationError> {
        self.dims
            .validate()
            .map_err(|e| VerificationError::InvalidConfig {
                reason: e.to_string(),
            })?;
        for modality in Modality::ALL {
            check_threshold(self.threshold_for(modality))?;
        }
        Ok(())
    }
}

fn check_threshold(value: f64) -> Result<f64, VerificationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(VerificationError::InvalidThreshold { value })
    }
}

/// Compares two embeddings of one modality and decides whether they match.
///
/// Pure: no state beyond its configuration, safe to share across requests.
#[derive(Debug, Clone)]
pub struct VerificationEngine {
    config: VerificationConfig,
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self {
            config: VerificationConfig::default(),
        }
    }
}

impl VerificationEngine {
    pub fn new(config: VerificationConfig) -> Result<Self, VerificationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn expected_dim(&self, modality: Modality) -> usize {
        self.config.dims.dim_for(modality)
    }

    /// Fuses cosine and Euclidean similarity and applies the threshold.
    ///
    /// `threshold` overrides the modality default for this call. Both embeddings must
    /// have the modality's configured dimension, otherwise no score is produced.
    pub fn compare(
        &self,
        a: &Embedding,
        b: &Embedding,
        modality: Modality,
        threshold: Option<f64>,
    ) -> Result<VerificationResult, VerificationError> {
        let threshold = match threshold {
            Some(value) => check_threshold(value)?,
            None => self.config.threshold_for(modality),
        };

        let expected = self.expected_dim(modality);
        if a.dim() != expected || b.dim() != expected {
            return Err(VerificationError::DimensionMismatch {
                modality,
                expected,
                left: a.dim(),
                right: b.dim(),
            });
        }

        let scores = similarity(a.as_slice(), b.as_slice());
        let is_match = scores.fused >= threshold;

        debug!(
            %modality,
            cosine = scores.cosine,
            euclidean = scores.euclidean,
            similarity = scores.fused,
            threshold,
            is_match,
            "Embeddings compared"
        );

        Ok(VerificationResult {
            modality,
            is_match,
            similarity: scores.fused,
            cosine: scores.cosine,
            euclidean: scores.euclidean,
            threshold,
        })
    }
}
