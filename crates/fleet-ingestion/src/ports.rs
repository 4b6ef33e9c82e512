//! Outbound (driven) ports for the ingestion bridge.

use fleet_types::PushEvent;

/// Delivery seam towards live viewers.
///
/// The broadcast hub implements this on the gateway side; the bridge only
/// requires that dispatch never blocks on a slow or dead viewer.
pub trait EventSink: Send + Sync {
    /// Fan one event out to every active viewer session.
    fn dispatch(&self, event: PushEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn dispatch(&self, _event: PushEvent) {}
}

/// Recording sink for tests.
#[cfg(test)]
pub(crate) struct RecordingSink {
    pub events: parking_lot::Mutex<Vec<PushEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn dispatch(&self, event: PushEvent) {
        self.events.lock().push(event);
    }
}
