//! Domain events flowing through the pipeline.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// One telemetry reading from a single vehicle.
///
/// Constructed by the ingestion bridge on bus receipt and immutable from
/// then on: the same value is pushed into the bounded store and fanned out
/// to every viewer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Vehicle identifier (`car_id` on the wire).
    pub source_id: String,
    /// Speed in km/h.
    pub speed: f64,
    /// Engine temperature in degrees Celsius.
    pub engine_temp: f64,
    /// Speed delta against the previous reading.
    pub speed_diff: f64,
    /// Engine temperature scaled into the unit interval.
    pub temp_normalized: f64,
    /// Receipt timestamp (unix seconds).
    pub timestamp: Timestamp,
}

/// The scoring decision for exactly one [`TelemetryEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    /// Vehicle identifier of the scored event.
    pub source_id: String,
    /// Whether the reconstruction error exceeded the configured threshold.
    pub is_anomaly: bool,
    /// Scalar deviation reported by the scorer.
    pub reconstruction_error: f64,
    /// Receipt timestamp (unix seconds).
    pub timestamp: Timestamp,
}

/// Event fanned out to live viewer sessions.
///
/// Serializes as `{"event": "car_data", "data": {...}}` so the browser can
/// dispatch on the `event` tag, mirroring the socket event names the
/// dashboard listens for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    /// A freshly ingested telemetry reading.
    CarData(TelemetryEvent),
    /// A freshly ingested anomaly verdict.
    AnomalyData(AnomalyVerdict),
}

impl PushEvent {
    /// The source vehicle this event refers to.
    #[must_use]
    pub fn source_id(&self) -> &str {
        match self {
            Self::CarData(e) => &e.source_id,
            Self::AnomalyData(v) => &v.source_id,
        }
    }
}
