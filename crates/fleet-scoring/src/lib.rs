//! # Fleet Scoring - Anomaly Scorer Adapter
//!
//! An independent bus consumer (its own subscription and receive loop,
//! decoupled from the ingestion bridge) that scores every telemetry event
//! and publishes exactly one verdict per scored event back onto the bus:
//!
//! ```text
//! cars/data ──→ feature vector ──→ normalize ──→ score ──→ threshold
//!                                                             │
//!                                       cars/anomalies ←──────┘
//! ```
//!
//! The model itself is an external collaborator behind the [`Scorer`]
//! trait: the adapter only builds the ordered feature vector, applies the
//! frozen linear normalization, and compares the returned reconstruction
//! error against a fixed threshold. Nothing is retrained or recalibrated at
//! runtime.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod config;
pub mod error;
pub mod ports;
pub mod scorer;
pub mod service;

pub use adapters::BusVerdictSink;
pub use config::{Feature, FeatureNorm, ScorerConfig};
pub use error::ScorerError;
pub use ports::VerdictSink;
pub use scorer::{MeanBaselineScorer, Scorer};
pub use service::ScorerService;

/// Default anomaly threshold, matching the pre-fit model calibration.
pub const DEFAULT_THRESHOLD: f64 = 0.05;
