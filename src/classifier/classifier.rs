use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::{ClassifierError, Department, KeywordTable, preprocess};
use crate::registry::{ModelRegistry, RegistryError};

/// Which stage produced a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationStage {
    /// Strict keyword winner with this many hits.
    Keyword { hits: usize },
    /// No keyword hit; the trained pipeline decided.
    Statistical,
    /// Internal failure; the configured fallback department was used.
    Fallback { reason: String },
}

impl ClassificationStage {
    pub fn routed_by(&self) -> RoutedBy {
        match self {
            ClassificationStage::Keyword { .. } => RoutedBy::Keyword,
            ClassificationStage::Statistical => RoutedBy::Model,
            ClassificationStage::Fallback { .. } => RoutedBy::Fallback,
        }
    }
}

/// Wire form of [`ClassificationStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutedBy {
    Keyword,
    Model,
    Fallback,
}

impl RoutedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutedBy::Keyword => "keyword",
            RoutedBy::Model => "model",
            RoutedBy::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationOutcome {
    pub department: Department,
    /// The text both stages actually saw.
    pub normalized_text: String,
    pub stage: ClassificationStage,
}

impl ClassificationOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.stage, ClassificationStage::Fallback { .. })
    }
}

/// Hybrid keyword + statistical query classifier.
///
/// Keyword counting decides whenever any department has a hit. Only when every count is
/// zero does the query reach the model bundle, which is loaded (or trained) through the
/// shared [`ModelRegistry`] on first use.
pub struct Classifier {
    keywords: KeywordTable,
    registry: Arc<ModelRegistry>,
    model_path: PathBuf,
    fallback: Department,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model_path", &self.model_path)
            .field("fallback", &self.fallback)
            .field("departments", &self.keywords.departments().count())
            .finish()
    }
}

impl Classifier {
    pub fn new(
        keywords: KeywordTable,
        registry: Arc<ModelRegistry>,
        model_path: impl Into<PathBuf>,
        fallback: Department,
    ) -> Self {
        Self {
            keywords,
            registry,
            model_path: model_path.into(),
            fallback,
        }
    }

    pub fn fallback(&self) -> Department {
        self.fallback
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Classifies `text`, reporting internal failures instead of hiding them.
    pub async fn try_classify(&self, text: &str) -> Result<ClassificationOutcome, ClassifierError> {
        let normalized = preprocess(text);
        let scores = self.keywords.score(&normalized);
        debug!(counts = ?scores.counts(), "Keyword counts");

        if let Some((department, hits)) = scores.best() {
            return Ok(ClassificationOutcome {
                department,
                normalized_text: normalized,
                stage: ClassificationStage::Keyword { hits },
            });
        }

        let bundle = self.registry.load_or_train(&self.model_path).await?;
        let label = bundle.predict(&normalized).ok_or_else(|| {
            ClassifierError::ModelUnavailable(RegistryError::Corrupted {
                reason: "bundle has no labels".to_string(),
            })
        })?;
        let department = label
            .parse::<Department>()
            .map_err(|_| ClassifierError::LabelDecode {
                label: label.to_string(),
            })?;
        debug!(%department, "Statistical stage decided");

        Ok(ClassificationOutcome {
            department,
            normalized_text: normalized,
            stage: ClassificationStage::Statistical,
        })
    }

    /// Classifies `text`; never fails.
    ///
    /// Any internal error degrades to the fallback department. Masks bugs in exchange
    /// for always producing a routable answer; use [`Classifier::try_classify`] where the
    /// distinction matters.
    pub async fn classify(&self, text: &str) -> ClassificationOutcome {
        match self.try_classify(text).await {
            Ok(outcome) => outcome,
            Err(e) => self.fallback_outcome(text, &e),
        }
    }

    /// Outcome used when classification fails internally.
    pub fn fallback_outcome(&self, text: &str, error: &ClassifierError) -> ClassificationOutcome {
        warn!(
            error = %error,
            fallback = %self.fallback,
            "Classification failed, using fallback department"
        );
        ClassificationOutcome {
            department: self.fallback,
            normalized_text: preprocess(text),
            stage: ClassificationStage::Fallback {
                reason: error.to_string(),
            },
        }
    }
}
