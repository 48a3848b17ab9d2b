//! Biometric match decisions.
//!
//! [`VerificationEngine::compare`] fuses cosine similarity with a normalised Euclidean
//! similarity (`1 / (1 + d)`) by unweighted average and compares the result with a
//! per-modality threshold. Dimension mismatches are rejected before any arithmetic, so
//! scores are always well-defined.

pub mod engine;
pub mod error;
pub mod metrics;
pub mod types;


pub use engine::{VerificationConfig, VerificationEngine};
pub use error::VerificationError;
pub use metrics::{SimilarityBreakdown, cosine_similarity, euclidean_similarity, similarity};
pub use types::{VerificationResult, VerificationState};
