//! Biometric embeddings and the extractor seam.
//!
//! - [`Embedding`] is the validated vector type shared by extraction and verification.
//! - [`EmbeddingProvider`] is the boundary to the external face/voice models.
//! - [`StubEmbeddingProvider`] keeps the service runnable without those models.

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use error::{EmbeddingError, ExtractionError};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;
pub use provider::{EmbeddingProvider, StubEmbeddingProvider};
pub use types::{Embedding, Modality};
