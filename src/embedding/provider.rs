use tracing::debug;

use super::{Embedding, ExtractionError, Modality};
use crate::constants::MIN_MEDIA_BYTES;
use crate::hashing::hash_to_u64;

/// Maps raw media to a fixed-length embedding.
///
/// Implementations are blocking (deep-model inference); callers run them on the
/// router's worker pool, never on a request task.
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    fn modality(&self) -> Modality;

    fn embedding_dim(&self) -> usize;

    fn embed(&self, media: &[u8]) -> Result<Embedding, ExtractionError>;

    /// `true` when no real model is behind this provider.
    fn is_stub(&self) -> bool {
        false
    }
}

/// Deterministic stand-in for the face/voice extractors.
///
/// The same media always yields the same unit-length vector. Payloads shorter than
/// [`MIN_MEDIA_BYTES`] report "no face" / "no speech".
#[derive(Debug, Clone)]
pub struct StubEmbeddingProvider {
    modality: Modality,
    dim: usize,
}

impl StubEmbeddingProvider {
    pub fn new(modality: Modality, dim: usize) -> Self {
        Self { modality, dim }
    }
}

impl EmbeddingProvider for StubEmbeddingProvider {
    fn modality(&self) -> Modality {
        self.modality
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, media: &[u8]) -> Result<Embedding, ExtractionError> {
        if media.len() < MIN_MEDIA_BYTES {
            return Err(match self.modality {
                Modality::Face => ExtractionError::NoFaceDetected,
                Modality::Voice => ExtractionError::NoSpeechDetected,
            });
        }

        let seed = hash_to_u64(media);
        debug!(
            modality = %self.modality,
            media_len = media.len(),
            seed,
            "Generating stub embedding"
        );

        let mut state = seed;
        let mut values = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            values.push(((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }

        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut values {
                *x /= norm;
            }
        }

        Embedding::new(values).map_err(|e| ExtractionError::ModelFailed {
            modality: self.modality,
            reason: e.to_string(),
        })
    }

    fn is_stub(&self) -> bool {
        true
    }
}
