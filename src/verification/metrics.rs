//! Similarity metrics over equal-length vectors.

use serde::Serialize;

/// Per-metric scores and their fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    /// Cosine similarity in `[-1, 1]`; `0.0` when either vector has zero magnitude.
    pub cosine: f64,
    /// `1 / (1 + euclidean_distance)`, in `(0, 1]`.
    pub euclidean: f64,
    /// Unweighted mean of the two.
    pub fused: f64,
}

/// Computes cosine, Euclidean similarity and the fused score in one pass.
///
/// Callers must pass slices of equal length; the engine checks dimensions first.
/// Accumulation is in `f64`, so identical inputs score exactly `1.0`.
pub fn similarity(a: &[f32], b: &[f32]) -> SimilarityBreakdown {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a_sq = 0.0f64;
    let mut norm_b_sq = 0.0f64;
    let mut dist_sq = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
        let d = x - y;
        dist_sq += d * d;
    }

    let cosine = if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        0.0
    } else {
        // sqrt(n * n) == n; taking the shortcut keeps self-similarity exact.
        let denom = if norm_a_sq == norm_b_sq {
            norm_a_sq
        } else {
            (norm_a_sq * norm_b_sq).sqrt()
        };
        (dot / denom).clamp(-1.0, 1.0)
    };

    let euclidean = 1.0 / (1.0 + dist_sq.sqrt());

    SimilarityBreakdown {
        cosine,
        euclidean,
        fused: (cosine + euclidean) / 2.0,
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    similarity(a, b).cosine
}

pub fn euclidean_similarity(a: &[f32], b: &[f32]) -> f64 {
    similarity(a, b).euclidean
}
