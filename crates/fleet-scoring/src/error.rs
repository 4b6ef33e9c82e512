//! Scoring error types.

use thiserror::Error;

/// Failure while scoring one telemetry event.
///
/// Non-fatal by contract: the verdict for the offending event is skipped,
/// nothing is retried, and the consume loop moves to the next event.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The external model rejected the invocation.
    #[error("scorer invocation failed: {0}")]
    Model(String),

    /// The feature vector could not be built or was malformed.
    #[error("malformed feature vector: {0}")]
    FeatureVector(String),

    /// The scorer returned a value that is not a finite error score.
    #[error("scorer returned invalid value: {0}")]
    InvalidScore(f64),
}
