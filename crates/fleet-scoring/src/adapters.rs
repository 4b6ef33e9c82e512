//! Adapters connecting the scorer to the bus.

use crate::VerdictSink;
use fleet_bus::BusPublisher;
use fleet_types::{AnomalyPayload, AnomalyVerdict};
use tracing::error;

/// Publishes verdicts onto the anomaly topic, fire-and-forget.
pub struct BusVerdictSink {
    publisher: BusPublisher,
    topic: String,
}

impl BusVerdictSink {
    /// Wrap a bus publisher targeting `topic`.
    #[must_use]
    pub fn new(publisher: BusPublisher, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }
}

impl VerdictSink for BusVerdictSink {
    fn publish(&self, verdict: &AnomalyVerdict) {
        match serde_json::to_vec(&AnomalyPayload::from_verdict(verdict)) {
            Ok(payload) => self.publisher.publish(&self.topic, payload),
            Err(e) => error!(source_id = %verdict.source_id, error = %e, "Verdict encode failed"),
        }
    }
}
