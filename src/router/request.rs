use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::types::{EMPTY_FILE, EMPTY_TEXT, FILE_PROCESSED, TEXT_PROCESSED};
use super::{ClassificationResult, Probe, RouterError, VerifyRequest, WorkerPool};
use crate::classifier::{Classifier, ClassifierError};
use crate::constants::validate_embedding_dim;
use crate::embedding::{Embedding, EmbeddingProvider, Modality};
use crate::hashing::{media_digest, to_hex};
use crate::transcription::{MediaKind, Transcriber};
use crate::verification::{VerificationEngine, VerificationResult, VerificationState};

/// Single entry point for verification, extraction and classification requests.
///
/// Holds every collaborator behind `Arc`, so one router serves all connections. Blocking
/// model calls go through the [`WorkerPool`]; classification and comparison run inline.
pub struct RequestRouter {
    face: Arc<dyn EmbeddingProvider>,
    voice: Arc<dyn EmbeddingProvider>,
    transcriber: Arc<dyn Transcriber>,
    engine: VerificationEngine,
    classifier: Arc<Classifier>,
    pool: WorkerPool,
}

impl std::fmt::Debug for RequestRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRouter")
            .field("face", &self.face)
            .field("voice", &self.voice)
            .field("transcriber", &self.transcriber)
            .field("engine", &self.engine)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl RequestRouter {
    /// Wires the collaborators together.
    ///
    /// Fails if a provider is registered under the wrong modality or produces vectors of
    /// a width the engine does not expect.
    pub fn new(
        face: Arc<dyn EmbeddingProvider>,
        voice: Arc<dyn EmbeddingProvider>,
        transcriber: Arc<dyn Transcriber>,
        engine: VerificationEngine,
        classifier: Arc<Classifier>,
        pool: WorkerPool,
    ) -> Result<Self, RouterError> {
        for (expected, provider) in [(Modality::Face, &face), (Modality::Voice, &voice)] {
            if provider.modality() != expected {
                return Err(RouterError::Internal(format!(
                    "{} provider registered for {}",
                    provider.modality(),
                    expected
                )));
            }
            validate_embedding_dim(provider.embedding_dim(), engine.expected_dim(expected))
                .map_err(|e| RouterError::Internal(format!("{} provider: {}", expected, e)))?;
        }

        Ok(Self {
            face,
            voice,
            transcriber,
            engine,
            classifier,
            pool,
        })
    }

    pub fn provider(&self, modality: Modality) -> &Arc<dyn EmbeddingProvider> {
        match modality {
            Modality::Face => &self.face,
            Modality::Voice => &self.voice,
        }
    }

    pub fn transcriber(&self) -> &Arc<dyn Transcriber> {
        &self.transcriber
    }

    pub fn engine(&self) -> &VerificationEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Runs the modality's extractor on `media`.
    #[instrument(skip(self, media), fields(media_len = media.len()))]
    pub async fn extract_embedding(
        &self,
        modality: Modality,
        media: Vec<u8>,
    ) -> Result<Embedding, RouterError> {
        if media.is_empty() {
            return Err(RouterError::Input(EMPTY_FILE.to_string()));
        }

        debug!(digest = %to_hex(&media_digest(&media)), "Extracting embedding");

        let provider = Arc::clone(self.provider(modality));
        let embedding = self
            .pool
            .run(move || provider.embed(&media))
            .await
            .map_err(|e| RouterError::from_pool("embedding extraction", e))??;

        debug!(dim = embedding.dim(), "Embedding extracted");
        Ok(embedding)
    }

    /// Decides whether the probe matches the stored reference.
    #[instrument(skip(self, request), fields(modality = %request.modality))]
    pub async fn verify(&self, request: VerifyRequest) -> Result<VerificationResult, RouterError> {
        let VerifyRequest {
            modality,
            probe,
            stored,
            threshold,
        } = request;
        let mut state = VerificationState::Idle;

        let probe = match probe {
            Probe::Embedding(embedding) => embedding,
            Probe::Media(media) => {
                state = state.advance(VerificationState::Extracting)?;
                match self.extract_embedding(modality, media).await {
                    Ok(embedding) => embedding,
                    Err(e) => return Err(fail(state, e)),
                }
            }
        };

        state = state.advance(VerificationState::Comparing)?;
        let result = match self.engine.compare(&probe, &stored, modality, threshold) {
            Ok(result) => result,
            Err(e) => return Err(fail(state, e.into())),
        };

        let state = state.advance(VerificationState::Decided {
            similarity: result.similarity,
            is_match: result.is_match,
        })?;
        info!(
            state = state.name(),
            similarity = result.similarity,
            threshold = result.threshold,
            is_match = result.is_match,
            "Verification decided"
        );

        Ok(result)
    }

    /// Classifies a typed query.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn classify_text(&self, text: &str) -> Result<ClassificationResult, RouterError> {
        if text.trim().is_empty() {
            return Err(RouterError::Input(EMPTY_TEXT.to_string()));
        }
        self.classify_transcript(text, TEXT_PROCESSED).await
    }

    /// Transcribes an uploaded audio/video query, then classifies the transcript.
    ///
    /// `file_name` only supplies the extension used to pick the media kind.
    #[instrument(skip(self, media), fields(media_len = media.len()))]
    pub async fn classify_file(
        &self,
        media: Vec<u8>,
        file_name: &str,
    ) -> Result<ClassificationResult, RouterError> {
        if media.is_empty() {
            return Err(RouterError::Input(EMPTY_FILE.to_string()));
        }

        let kind = MediaKind::from_extension(file_name).ok_or_else(|| {
            RouterError::Input(format!(
                "Unsupported file type '{}'. Upload an audio or video file.",
                file_name
            ))
        })?;

        let transcriber = Arc::clone(&self.transcriber);
        let transcript = self
            .pool
            .run(move || transcriber.transcribe(&media, kind))
            .await
            .map_err(|e| RouterError::from_pool("transcription", e))??;

        match transcript.filter(|t| !t.trim().is_empty()) {
            Some(text) => {
                debug!(%kind, text_len = text.len(), "Media transcribed");
                self.classify_transcript(&text, FILE_PROCESSED).await
            }
            None => {
                info!(%kind, "No speech in uploaded media");
                Ok(ClassificationResult::unprocessed())
            }
        }
    }

    async fn classify_transcript(
        &self,
        text: &str,
        message: &str,
    ) -> Result<ClassificationResult, RouterError> {
        let outcome = match self.classifier.try_classify(text).await {
            Ok(outcome) => outcome,
            Err(ClassifierError::ModelUnavailable(e)) => {
                return Err(RouterError::ModelUnavailable(e.to_string()));
            }
            Err(e) => self.classifier.fallback_outcome(text, &e),
        };

        info!(
            department = %outcome.department,
            routed_by = outcome.stage.routed_by().as_str(),
            "Query classified"
        );
        Ok(ClassificationResult::classified(text, outcome, message))
    }
}

fn fail(state: VerificationState, error: RouterError) -> RouterError {
    let failed = VerificationState::Failed {
        kind: error.kind(),
        reason: error.to_string(),
    };
    match state.advance(failed) {
        Ok(state) => warn!(
            state = state.name(),
            kind = error.kind(),
            error = %error,
            "Verification failed"
        ),
        Err(e) => warn!(error = %e, "Unexpected verification state"),
    }
    error
}
