//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! Embedding dimensionality is fixed per modality. The compile-time constants below are the
//! defaults; deployments that swap extractor models carry their own sizes through
//! [`DimConfig`] and check them at module boundaries with [`validate_embedding_dim`].

use crate::embedding::Modality;

/// ArcFace-style face embedding width.
pub const FACE_EMBEDDING_DIM: usize = 512;
/// Speaker (d-vector) embedding width.
pub const VOICE_EMBEDDING_DIM: usize = 256;

pub const DEFAULT_FACE_THRESHOLD: f64 = 0.5;
pub const DEFAULT_VOICE_THRESHOLD: f64 = 0.8;

/// Payloads shorter than this cannot contain a usable face or speech sample.
pub const MIN_MEDIA_BYTES: usize = 16;

pub const DEFAULT_MODEL_FILENAME: &str = "categorization_model.rkyv";

pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;
pub const DEFAULT_EXTERNAL_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Runtime dimension configuration for both biometric modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    pub face_dim: usize,
    pub voice_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            face_dim: FACE_EMBEDDING_DIM,
            voice_dim: VOICE_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    pub fn new(face_dim: usize, voice_dim: usize) -> Self {
        Self {
            face_dim,
            voice_dim,
        }
    }

    /// Expected embedding width for `modality`.
    pub fn dim_for(&self, modality: Modality) -> usize {
        match modality {
            Modality::Face => self.face_dim,
            Modality::Voice => self.voice_dim,
        }
    }

    /// Rejects zero-width modalities.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        for modality in Modality::ALL {
            if self.dim_for(modality) == 0 {
                return Err(DimValidationError::ZeroDimension { modality });
            }
        }
        Ok(())
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension { modality: Modality },
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension { modality } => {
                write!(f, "{} embedding dimension cannot be zero", modality)
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use teller::constants::{validate_embedding_dim, FACE_EMBEDDING_DIM};
///
/// let extractor_dim = 512;
/// validate_embedding_dim(extractor_dim, FACE_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_config_default() {
        let config = DimConfig::default();
        assert_eq!(config.dim_for(Modality::Face), FACE_EMBEDDING_DIM);
        assert_eq!(config.dim_for(Modality::Voice), VOICE_EMBEDDING_DIM);
    }

    #[test]
    fn test_dim_config_validate_success() {
        assert!(DimConfig::new(128, 64).validate().is_ok());
    }

    #[test]
    fn test_dim_config_validate_zero() {
        assert_eq!(
            DimConfig::new(512, 0).validate(),
            Err(DimValidationError::ZeroDimension {
                modality: Modality::Voice
            })
        );
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert!(validate_embedding_dim(512, 512).is_ok());
        assert_eq!(
            validate_embedding_dim(256, 512),
            Err(DimValidationError::DimensionMismatch {
                expected: 512,
                actual: 256
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension {
            modality: Modality::Face,
        };
        assert_eq!(err.to_string(), "face embedding dimension cannot be zero");
    }
}
