//! The scorer seam and the built-in baseline.

use crate::ScorerError;

/// Black-box reconstruction scorer.
///
/// Takes the normalized feature vector in configured order and returns a
/// scalar reconstruction error. Implementations wrap whatever model the
/// deployment ships; the adapter never inspects the model.
pub trait Scorer: Send + Sync {
    fn score(&self, features: &[f64]) -> Result<f64, ScorerError>;
}

/// Baseline scorer used when no external model is wired in.
///
/// Reconstructs every normalized feature as its training mean (zero after
/// standardization), so the reconstruction error is the mean squared
/// z-score. A real autoencoder implements [`Scorer`] in its place.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanBaselineScorer;

impl Scorer for MeanBaselineScorer {
    fn score(&self, features: &[f64]) -> Result<f64, ScorerError> {
        if features.is_empty() {
            return Err(ScorerError::FeatureVector(
                "empty feature vector".to_string(),
            ));
        }
        if let Some(bad) = features.iter().find(|v| !v.is_finite()) {
            return Err(ScorerError::FeatureVector(format!(
                "non-finite feature value {bad}"
            )));
        }
        let sum_sq: f64 = features.iter().map(|v| v * v).sum();
        Ok(sum_sq / features.len() as f64)
    }
}
