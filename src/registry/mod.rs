//! Model bundle lifecycle for the statistical classification stage.
//!
//! - [`TextPipeline`]: TF-IDF features + multinomial Naive Bayes.
//! - [`ModelBundle`]: pipeline + label encoding + version markers, serialised with rkyv.
//! - [`BundleStore`]: one file on disk, replaced atomically.
//! - [`ModelRegistry`]: single-flight load-or-train, explicit retrain and invalidate.

pub mod bundle;
pub mod corpus;
pub mod error;
pub mod manager;
pub mod model;
pub mod store;


pub use bundle::{BUNDLE_FORMAT_VERSION, BUNDLE_MAGIC, ModelBundle};
pub use corpus::{CORPUS_VERSION, TrainingCorpus};
pub use error::RegistryError;
pub use manager::ModelRegistry;
pub use model::{MultinomialNb, SparseRow, TextPipeline, TfidfVectorizer};
pub use store::{BundleStore, LoadOutcome};
