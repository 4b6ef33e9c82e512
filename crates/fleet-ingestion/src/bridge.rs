//! The ingestion bridge receive loop and per-message routing.

use crate::{DecodeError, EventSink};
use fleet_bus::BusClient;
use fleet_store::EventStore;
use fleet_types::{AnomalyPayload, PushEvent, TelemetryPayload, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Consumes from the bus, buffers recent events, forwards to the hub.
pub struct IngestionBridge {
    store: Arc<EventStore>,
    sink: Arc<dyn EventSink>,
    data_topic: String,
    anomaly_topic: String,
}

impl IngestionBridge {
    /// Create a bridge routing `data_topic` and `anomaly_topic` messages.
    #[must_use]
    pub fn new(
        store: Arc<EventStore>,
        sink: Arc<dyn EventSink>,
        data_topic: impl Into<String>,
        anomaly_topic: impl Into<String>,
    ) -> Self {
        Self {
            store,
            sink,
            data_topic: data_topic.into(),
            anomaly_topic: anomaly_topic.into(),
        }
    }

    /// Drive the receive loop until the bus client shuts down.
    ///
    /// The bus client owns reconnection; while the broker is away this loop
    /// simply waits, and everything already buffered stays served.
    pub async fn run(self, mut bus: BusClient) {
        info!(
            data_topic = %self.data_topic,
            anomaly_topic = %self.anomaly_topic,
            "Ingestion bridge started"
        );

        while let Some(message) = bus.recv().await {
            if let Err(e) = self.handle_message(&message.topic, &message.payload) {
                warn!(error = %e, "Message dropped");
            }
        }

        info!("Ingestion bridge stopped");
    }

    /// Decode and route one message. Failures affect only this message.
    pub fn handle_message(&self, topic: &str, payload: &[u8]) -> Result<(), DecodeError> {
        if topic == self.data_topic {
            let decoded: TelemetryPayload =
                serde_json::from_slice(payload).map_err(|e| DecodeError::payload(topic, e))?;
            let event = decoded.into_event(unix_now());
            debug!(source_id = %event.source_id, speed = event.speed, "Telemetry ingested");
            self.store.push_telemetry(event.clone());
            self.sink.dispatch(PushEvent::CarData(event));
        } else if topic == self.anomaly_topic {
            let decoded: AnomalyPayload =
                serde_json::from_slice(payload).map_err(|e| DecodeError::payload(topic, e))?;
            let verdict = decoded.into_verdict(unix_now());
            debug!(
                source_id = %verdict.source_id,
                is_anomaly = verdict.is_anomaly,
                "Verdict ingested"
            );
            self.store.push_anomaly(verdict.clone());
            self.sink.dispatch(PushEvent::AnomalyData(verdict));
        } else {
            debug!(topic, "Message on unrouted topic ignored");
        }
        Ok(())
    }
}

fn unix_now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as Timestamp
}
