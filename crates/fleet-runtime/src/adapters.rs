//! Adapters connecting subsystem ports across crate boundaries.

use fleet_gateway::BroadcastHub;
use fleet_ingestion::EventSink;
use fleet_types::PushEvent;
use std::sync::Arc;

/// Feeds bridge dispatches into the gateway's broadcast hub.
pub struct HubSink {
    hub: Arc<BroadcastHub>,
}

impl HubSink {
    #[must_use]
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }
}

impl EventSink for HubSink {
    fn dispatch(&self, event: PushEvent) {
        self.hub.dispatch(event);
    }
}
