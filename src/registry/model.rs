//! TF-IDF vectoriser and multinomial Naive Bayes.

use std::collections::{BTreeMap, BTreeSet};

use rkyv::{Archive, Deserialize, Serialize};

use super::RegistryError;
use crate::classifier::tokenize;

/// Sparse row: `(feature index, weight)` sorted by index.
pub type SparseRow = Vec<(usize, f64)>;

/// Term-frequency / inverse-document-frequency features over a sorted vocabulary.
///
/// Smoothed idf `ln((1 + n) / (1 + df)) + 1`, raw term counts, rows L2-normalised.
/// Tokens outside the vocabulary are ignored at transform time.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for document in documents {
            let unique: BTreeSet<&str> = tokenize(document.as_ref()).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let (vocabulary, idf) = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let idf = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term.to_string(), idf)
            })
            .unzip();

        Self { vocabulary, idf }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
    }

    pub fn transform(&self, document: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(index) = self.index_of(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(RegistryError::Corrupted {
                reason: format!(
                    "idf has {} weights for {} terms",
                    self.idf.len(),
                    self.vocabulary.len()
                ),
            });
        }
        if self.vocabulary.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RegistryError::Corrupted {
                reason: "vocabulary is not strictly sorted".to_string(),
            });
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(RegistryError::Corrupted {
                reason: "non-finite idf weight".to_string(),
            });
        }
        Ok(())
    }
}

/// Multinomial Naive Bayes with additive (Lidstone) smoothing.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` log-probabilities.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub const DEFAULT_ALPHA: f64 = 0.1;

    pub fn fit(
        rows: &[SparseRow],
        labels: &[usize],
        n_classes: usize,
        n_features: usize,
        alpha: f64,
    ) -> Result<Self, RegistryError> {
        if rows.len() != labels.len() {
            return Err(RegistryError::Training {
                reason: format!("{} rows but {} labels", rows.len(), labels.len()),
            });
        }
        if rows.is_empty() || n_classes == 0 {
            return Err(RegistryError::Training {
                reason: "no training samples".to_string(),
            });
        }
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(RegistryError::Training {
                reason: format!("alpha must be positive, got {}", alpha),
            });
        }

        let mut class_count = vec![0usize; n_classes];
        let mut feature_count = vec![vec![0.0f64; n_features]; n_classes];

        for (row, &label) in rows.iter().zip(labels) {
            if label >= n_classes {
                return Err(RegistryError::Training {
                    reason: format!("label {} out of range for {} classes", label, n_classes),
                });
            }
            class_count[label] += 1;
            for &(feature, weight) in row {
                feature_count[label][feature] += weight;
            }
        }

        if let Some(empty) = class_count.iter().position(|&c| c == 0) {
            return Err(RegistryError::Training {
                reason: format!("class {} has no samples", empty),
            });
        }

        let total = rows.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&c| (c as f64).ln() - total.ln())
            .collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let smoothed_total: f64 = counts.iter().map(|c| c + alpha).sum();
                let log_total = smoothed_total.ln();
                counts
                    .into_iter()
                    .map(|c| (c + alpha).ln() - log_total)
                    .collect()
            })
            .collect();

        Ok(Self {
            alpha,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    /// Joint log-likelihood per class.
    pub fn joint_log_likelihood(&self, row: &[(usize, f64)]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .map(|&(feature, weight)| weight * log_probs[feature])
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most likely class; the lowest index wins ties.
    pub fn predict(&self, row: &[(usize, f64)]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (class, score) in self.joint_log_likelihood(row).into_iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((class, score)),
            }
        }
        best.map(|(class, _)| class)
    }

    fn validate(&self, n_features: usize) -> Result<(), RegistryError> {
        if self.feature_log_prob.len() != self.class_log_prior.len() {
            return Err(RegistryError::Corrupted {
                reason: "class count disagrees between prior and likelihoods".to_string(),
            });
        }
        if self.feature_log_prob.iter().any(|r| r.len() != n_features) {
            return Err(RegistryError::Corrupted {
                reason: "likelihood table does not match vocabulary".to_string(),
            });
        }
        let finite = self.class_log_prior.iter().all(|v| v.is_finite())
            && self.feature_log_prob.iter().flatten().all(|v| v.is_finite());
        if !finite {
            return Err(RegistryError::Corrupted {
                reason: "non-finite model parameter".to_string(),
            });
        }
        Ok(())
    }
}

/// Vectoriser + classifier fitted together.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct TextPipeline {
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

impl TextPipeline {
    /// Fits on already-preprocessed documents and encoded labels.
    pub fn fit<S: AsRef<str>>(
        documents: &[S],
        labels: &[usize],
        n_classes: usize,
        alpha: f64,
    ) -> Result<Self, RegistryError> {
        let vectorizer = TfidfVectorizer::fit(documents);
        if vectorizer.is_empty() {
            return Err(RegistryError::Training {
                reason: "training corpus produced an empty vocabulary".to_string(),
            });
        }
        let rows: Vec<SparseRow> = documents
            .iter()
            .map(|d| vectorizer.transform(d.as_ref()))
            .collect();
        let classifier = MultinomialNb::fit(&rows, labels, n_classes, vectorizer.len(), alpha)?;

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn n_classes(&self) -> usize {
        self.classifier.n_classes()
    }

    pub fn predict(&self, normalized: &str) -> Option<usize> {
        self.classifier
            .predict(&self.vectorizer.transform(normalized))
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.len())
    }
}
