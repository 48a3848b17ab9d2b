//! Scripted extractor for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Embedding, EmbeddingProvider, ExtractionError, Modality};

#[derive(Debug, Clone)]
enum MockBehavior {
    Return(Embedding),
    Fail(ExtractionError),
}

/// Returns a fixed embedding or error and counts calls.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    modality: Modality,
    dim: usize,
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockEmbeddingProvider {
    pub fn returning(modality: Modality, embedding: Embedding) -> Self {
        Self {
            modality,
            dim: embedding.dim(),
            behavior: MockBehavior::Return(embedding),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(modality: Modality, dim: usize, error: ExtractionError) -> Self {
        Self {
            modality,
            dim,
            behavior: MockBehavior::Fail(error),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Blocks the worker thread for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    fn modality(&self) -> Modality {
        self.modality
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, _media: &[u8]) -> Result<Embedding, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match &self.behavior {
            MockBehavior::Return(embedding) => Ok(embedding.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
        }
    }
}
