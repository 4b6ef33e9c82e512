//! # Fleet Store - Bounded Recent-Event Buffers
//!
//! Two independently-capacitied FIFO buffers hold the most recent telemetry
//! events and anomaly verdicts for the query endpoint. Overflow is not an
//! error: when a push would exceed capacity the oldest element is evicted.
//!
//! ## Concurrency Model
//!
//! Single writer (the ingestion bridge), multiple readers (query endpoint,
//! tests). Each buffer sits behind its own `parking_lot::Mutex`, so a
//! snapshot of one buffer never contends with writes to the other, and
//! readers only coordinate with the writer for the duration of the copy.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod buffer;

pub use buffer::BoundedBuffer;

use fleet_types::{AnomalyVerdict, TelemetryEvent};
use parking_lot::Mutex;

/// Default capacity per buffer.
pub const DEFAULT_CAPACITY: usize = 100;

/// The shared recent-event store: one bounded buffer per topic.
pub struct EventStore {
    telemetry: Mutex<BoundedBuffer<TelemetryEvent>>,
    anomalies: Mutex<BoundedBuffer<AnomalyVerdict>>,
}

impl EventStore {
    /// Create a store with the given capacity for each buffer.
    #[must_use]
    pub fn new(telemetry_capacity: usize, anomaly_capacity: usize) -> Self {
        Self {
            telemetry: Mutex::new(BoundedBuffer::new(telemetry_capacity)),
            anomalies: Mutex::new(BoundedBuffer::new(anomaly_capacity)),
        }
    }

    /// Append a telemetry event, evicting the oldest at capacity.
    pub fn push_telemetry(&self, event: TelemetryEvent) {
        self.telemetry.lock().push(event);
    }

    /// Append an anomaly verdict, evicting the oldest at capacity.
    pub fn push_anomaly(&self, verdict: AnomalyVerdict) {
        self.anomalies.lock().push(verdict);
    }

    /// Insertion-ordered copy of the buffered telemetry events.
    #[must_use]
    pub fn telemetry_snapshot(&self) -> Vec<TelemetryEvent> {
        self.telemetry.lock().snapshot()
    }

    /// Insertion-ordered copy of the buffered anomaly verdicts.
    #[must_use]
    pub fn anomaly_snapshot(&self) -> Vec<AnomalyVerdict> {
        self.anomalies.lock().snapshot()
    }

    /// Current buffer lengths as `(telemetry, anomalies)`.
    #[must_use]
    pub fn lens(&self) -> (usize, usize) {
        (self.telemetry.lock().len(), self.anomalies.lock().len())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }
}
