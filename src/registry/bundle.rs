//! Versioned, schema-checked model bundle.
//!
//! # File layout
//!
//! ```text
//! +-------------+---------------------+---------------------------+
//! | magic "TLMB"| format version u32le| rkyv archive (ModelBundle)|
//! +-------------+---------------------+---------------------------+
//! ```
//!
//! The version is checked before the archive is touched, so a file written by an
//! incompatible build is rejected instead of misread.

use chrono::{DateTime, Utc};
use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

use super::{MultinomialNb, RegistryError, TextPipeline, TrainingCorpus};
use crate::classifier::preprocess;

pub const BUNDLE_MAGIC: [u8; 4] = *b"TLMB";
pub const BUNDLE_FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 8;

/// Trained pipeline plus its label encoding.
///
/// Immutable: retraining produces a new bundle that replaces this one wholesale.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Unique per training run.
    pub bundle_id: String,
    pub created_at_ms: i64,
    pub corpus_version: u32,
    pub corpus_fingerprint: [u8; 32],
    /// Class index -> department name, sorted.
    pub labels: Vec<String>,
    pub pipeline: TextPipeline,
}

impl ModelBundle {
    /// Fits a pipeline on `corpus` using the shared query preprocessing.
    pub fn train(corpus: &TrainingCorpus) -> Result<Self, RegistryError> {
        if corpus.is_empty() {
            return Err(RegistryError::Training {
                reason: "training corpus is empty".to_string(),
            });
        }

        let mut labels: Vec<String> = corpus
            .samples()
            .iter()
            .map(|(_, department)| department.name().to_string())
            .collect();
        labels.sort();
        labels.dedup();

        let mut documents = Vec::with_capacity(corpus.len());
        let mut encoded = Vec::with_capacity(corpus.len());
        for (text, department) in corpus.samples() {
            documents.push(preprocess(text));
            let index = labels
                .binary_search_by(|l| l.as_str().cmp(department.name()))
                .map_err(|_| RegistryError::Training {
                    reason: format!("label for {} missing from encoding", department),
                })?;
            encoded.push(index);
        }

        let pipeline =
            TextPipeline::fit(&documents, &encoded, labels.len(), MultinomialNb::DEFAULT_ALPHA)?;

        let bundle = Self {
            bundle_id: uuid::Uuid::new_v4().to_string(),
            created_at_ms: Utc::now().timestamp_millis(),
            corpus_version: corpus.version(),
            corpus_fingerprint: corpus.fingerprint(),
            labels,
            pipeline,
        };

        info!(
            bundle_id = %bundle.bundle_id,
            samples = corpus.len(),
            vocabulary = bundle.pipeline.vectorizer().len(),
            classes = bundle.labels.len(),
            "Model bundle trained"
        );

        Ok(bundle)
    }

    /// Predicted label for preprocessed text.
    pub fn predict(&self, normalized: &str) -> Option<&str> {
        self.pipeline
            .predict(normalized)
            .and_then(|index| self.labels.get(index))
            .map(String::as_str)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at_ms)
    }

    /// `true` if this bundle was trained from exactly `corpus`.
    pub fn matches_corpus(&self, corpus: &TrainingCorpus) -> bool {
        self.corpus_version == corpus.version() && self.corpus_fingerprint == corpus.fingerprint()
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.labels.is_empty() {
            return Err(RegistryError::Corrupted {
                reason: "bundle has no labels".to_string(),
            });
        }
        if self.labels.len() != self.pipeline.n_classes() {
            return Err(RegistryError::Corrupted {
                reason: format!(
                    "{} labels for {} classes",
                    self.labels.len(),
                    self.pipeline.n_classes()
                ),
            });
        }
        self.pipeline.validate()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RegistryError> {
        let archive = rkyv::to_bytes::<RkyvError>(self).map_err(|e| RegistryError::Serialization {
            reason: e.to_string(),
        })?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + archive.len());
        bytes.extend_from_slice(&BUNDLE_MAGIC);
        bytes.extend_from_slice(&BUNDLE_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&archive);
        Ok(bytes)
    }

    /// Checks the header, then validates and deserializes the archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
        if bytes.len() < HEADER_LEN {
            return Err(RegistryError::Corrupted {
                reason: format!("file is {} bytes, shorter than the header", bytes.len()),
            });
        }
        if bytes[0..4] != BUNDLE_MAGIC {
            return Err(RegistryError::Corrupted {
                reason: "bad magic".to_string(),
            });
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..HEADER_LEN]);
        let found = u32::from_le_bytes(version);
        if found != BUNDLE_FORMAT_VERSION {
            return Err(RegistryError::VersionMismatch {
                found,
                expected: BUNDLE_FORMAT_VERSION,
            });
        }

        // The archive needs aligned storage; file bytes after the header are not.
        let payload = &bytes[HEADER_LEN..];
        let mut aligned: AlignedVec = AlignedVec::with_capacity(payload.len());
        aligned.extend_from_slice(payload);

        let bundle = rkyv::from_bytes::<ModelBundle, RkyvError>(&aligned).map_err(|e| {
            RegistryError::Corrupted {
                reason: e.to_string(),
            }
        })?;
        bundle.validate()?;
        Ok(bundle)
    }
}
