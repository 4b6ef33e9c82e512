//! Wire payloads as published on the broker topics.
//!
//! Field names are fixed by the broker contract and must not be renamed:
//! the simulator, the scorer service, and the dashboard all agree on them.

use crate::{AnomalyVerdict, TelemetryEvent, Timestamp};
use serde::{Deserialize, Serialize};

/// Payload on the telemetry topic (default `cars/data`).
///
/// `timestamp` is optional on the wire; the bridge stamps receipt time when
/// the producer did not include one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    pub car_id: String,
    pub speed: f64,
    pub engine_temp: f64,
    pub speed_diff: f64,
    pub temp_normalized: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl TelemetryPayload {
    /// Promote the wire payload to a domain event, stamping `now` when the
    /// producer omitted a timestamp.
    #[must_use]
    pub fn into_event(self, now: Timestamp) -> TelemetryEvent {
        TelemetryEvent {
            source_id: self.car_id,
            speed: self.speed,
            engine_temp: self.engine_temp,
            speed_diff: self.speed_diff,
            temp_normalized: self.temp_normalized,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

/// Payload on the anomaly topic (default `cars/anomalies`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPayload {
    pub car_id: String,
    pub anomaly: bool,
    pub reconstruction_error: f64,
}

impl AnomalyPayload {
    /// Build the wire payload for a verdict.
    #[must_use]
    pub fn from_verdict(verdict: &AnomalyVerdict) -> Self {
        Self {
            car_id: verdict.source_id.clone(),
            anomaly: verdict.is_anomaly,
            reconstruction_error: verdict.reconstruction_error,
        }
    }

    /// Promote the wire payload to a domain verdict.
    #[must_use]
    pub fn into_verdict(self, now: Timestamp) -> AnomalyVerdict {
        AnomalyVerdict {
            source_id: self.car_id,
            is_anomaly: self.anomaly,
            reconstruction_error: self.reconstruction_error,
            timestamp: now,
        }
    }
}
