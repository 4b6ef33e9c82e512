//! Scorer configuration: feature ordering, frozen normalization, threshold.

use crate::{ScorerError, DEFAULT_THRESHOLD};
use fleet_types::TelemetryEvent;
use serde::{Deserialize, Serialize};

/// The telemetry fields the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Speed,
    EngineTemp,
    SpeedDiff,
    TempNormalized,
}

impl Feature {
    /// Extract this feature's raw value from an event.
    #[must_use]
    pub fn extract(self, event: &TelemetryEvent) -> f64 {
        match self {
            Self::Speed => event.speed,
            Self::EngineTemp => event.engine_temp,
            Self::SpeedDiff => event.speed_diff,
            Self::TempNormalized => event.temp_normalized,
        }
    }
}

/// Frozen linear normalization for one feature: `(x - mean) / scale`.
///
/// Parameters come from the offline training pipeline and are never
/// refitted at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureNorm {
    pub feature: Feature,
    pub mean: f64,
    pub scale: f64,
}

impl FeatureNorm {
    /// Identity normalization for a feature.
    #[must_use]
    pub fn identity(feature: Feature) -> Self {
        Self {
            feature,
            mean: 0.0,
            scale: 1.0,
        }
    }
}

/// Externally supplied scorer configuration, immutable for the adapter's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Feature ordering and normalization, in model input order.
    pub normalization: Vec<FeatureNorm>,
    /// Fixed anomaly threshold on the reconstruction error.
    pub threshold: f64,
}

impl ScorerConfig {
    /// Reject configurations the adapter cannot score with.
    pub fn validate(&self) -> Result<(), ScorerError> {
        if self.normalization.is_empty() {
            return Err(ScorerError::FeatureVector(
                "empty feature ordering".to_string(),
            ));
        }
        for norm in &self.normalization {
            if !norm.scale.is_finite() || norm.scale == 0.0 {
                return Err(ScorerError::FeatureVector(format!(
                    "non-finite or zero scale for {:?}",
                    norm.feature
                )));
            }
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ScorerError::FeatureVector(format!(
                "invalid threshold {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Build the normalized feature vector in the configured order.
    #[must_use]
    pub fn feature_vector(&self, event: &TelemetryEvent) -> Vec<f64> {
        self.normalization
            .iter()
            .map(|norm| (norm.feature.extract(event) - norm.mean) / norm.scale)
            .collect()
    }
}

impl Default for ScorerConfig {
    /// The four features the original model was fit on, in training order,
    /// with identity normalization. Deployments replace the normalization
    /// with the frozen parameters exported alongside the model.
    fn default() -> Self {
        Self {
            normalization: vec![
                FeatureNorm::identity(Feature::Speed),
                FeatureNorm::identity(Feature::EngineTemp),
                FeatureNorm::identity(Feature::SpeedDiff),
                FeatureNorm::identity(Feature::TempNormalized),
            ],
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
