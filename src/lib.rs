//! Teller library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Decisions
//! - [`VerificationEngine`] - fused cosine/Euclidean biometric match decisions
//! - [`Classifier`] - keyword-first, statistical-fallback department routing
//! - [`ModelRegistry`] - single-flight load-or-train of the classification bundle
//!
//! ## Orchestration
//! - [`RequestRouter`] - input validation, bounded worker pool, uniform errors
//! - [`gateway`] - Axum HTTP surface
//!
//! ## Collaborator seams
//! - [`EmbeddingProvider`], [`Transcriber`] - external deep-model boundaries, with stub
//!   implementations for running without them
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod registry;
pub mod router;
pub mod transcription;
pub mod verification;

pub use classifier::{
    ClassificationOutcome, ClassificationStage, Classifier, ClassifierError, Department,
    KeywordConfig, KeywordTable, RoutedBy,
};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use embedding::{
    Embedding, EmbeddingError, EmbeddingProvider, ExtractionError, Modality,
    StubEmbeddingProvider,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use hashing::{corpus_fingerprint, hash_to_u64, media_digest};
pub use registry::{ModelBundle, ModelRegistry, RegistryError, TrainingCorpus};
pub use router::{
    ClassificationResult, PoolError, Probe, RequestRouter, RouterError, VerifyRequest,
    WorkerPool,
};
#[cfg(any(test, feature = "mock"))]
pub use transcription::MockTranscriber;
pub use transcription::{MediaKind, StubTranscriber, Transcriber, TranscriptionError};
pub use verification::{
    VerificationConfig, VerificationEngine, VerificationError, VerificationResult,
    VerificationState,
};
