use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EmbeddingError;

/// Biometric modality. Each modality has its own extractor, dimension and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Face,
    Voice,
}

impl Modality {
    pub const ALL: [Modality; 2] = [Modality::Face, Modality::Voice];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Face => "face",
            Modality::Voice => "voice",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "face" => Ok(Modality::Face),
            "voice" => Ok(Modality::Voice),
            other => Err(format!("unknown modality '{}'", other)),
        }
    }
}

/// A biometric embedding: a non-empty vector of finite numbers.
///
/// Immutable once constructed. Dimensionality is checked against the modality by the
/// verification engine, not here, so the same type carries face and voice vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite { index });
        }
        Ok(Self(values))
    }

    /// Parses a stored embedding serialized as a JSON array of numbers.
    pub fn from_json(payload: &str) -> Result<Self, EmbeddingError> {
        let raw: Vec<f64> =
            serde_json::from_str(payload.trim()).map_err(|e| EmbeddingError::Malformed {
                reason: e.to_string(),
            })?;
        // Values beyond f32 range become infinite here and are rejected by `new`.
        Self::new(raw.into_iter().map(|v| v as f32).collect())
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = EmbeddingError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(embedding: Embedding) -> Self {
        embedding.0
    }
}
