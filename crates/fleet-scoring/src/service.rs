//! The scorer consume loop.

use crate::{Scorer, ScorerConfig, ScorerError, VerdictSink};
use fleet_bus::BusClient;
use fleet_types::{AnomalyVerdict, TelemetryEvent, TelemetryPayload, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scores telemetry events and publishes verdicts.
///
/// Runs its own receive loop against the telemetry topic, in parallel with
/// the ingestion bridge. The single loop preserves per-source arrival
/// order; no cross-source order is guaranteed.
pub struct ScorerService {
    config: ScorerConfig,
    scorer: Arc<dyn Scorer>,
    sink: Arc<dyn VerdictSink>,
}

impl ScorerService {
    /// Create a service. Fails if the configuration is unusable.
    pub fn new(
        config: ScorerConfig,
        scorer: Arc<dyn Scorer>,
        sink: Arc<dyn VerdictSink>,
    ) -> Result<Self, ScorerError> {
        config.validate()?;
        Ok(Self {
            config,
            scorer,
            sink,
        })
    }

    /// Drive the consume loop until the bus client shuts down.
    pub async fn run(self, mut bus: BusClient) {
        info!(threshold = self.config.threshold, "Scorer adapter started");

        while let Some(message) = bus.recv().await {
            self.handle_payload(&message.payload);
        }

        info!("Scorer adapter stopped");
    }

    /// Score one raw payload; at most one verdict is published for it.
    ///
    /// Decode failures and scorer failures are logged and the event is
    /// skipped without retry.
    pub fn handle_payload(&self, payload: &[u8]) {
        let decoded: TelemetryPayload = match serde_json::from_slice(payload) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Unscorable payload dropped");
                return;
            }
        };
        let event = decoded.into_event(unix_now());

        match self.score_event(&event) {
            Ok(verdict) => {
                debug!(
                    source_id = %verdict.source_id,
                    reconstruction_error = verdict.reconstruction_error,
                    is_anomaly = verdict.is_anomaly,
                    "Event scored"
                );
                self.sink.publish(&verdict);
            }
            Err(e) => {
                warn!(source_id = %event.source_id, error = %e, "Verdict skipped");
            }
        }
    }

    /// Build the feature vector, score it, and compare against the
    /// threshold. Pure with respect to the sink.
    pub fn score_event(&self, event: &TelemetryEvent) -> Result<AnomalyVerdict, ScorerError> {
        let features = self.config.feature_vector(event);
        let reconstruction_error = self.scorer.score(&features)?;
        if !reconstruction_error.is_finite() {
            return Err(ScorerError::InvalidScore(reconstruction_error));
        }

        Ok(AnomalyVerdict {
            source_id: event.source_id.clone(),
            is_anomaly: reconstruction_error > self.config.threshold,
            reconstruction_error,
            timestamp: event.timestamp,
        })
    }
}

fn unix_now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as Timestamp
}
