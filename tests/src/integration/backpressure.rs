//! # Backpressure and Session Lifecycle Flows
//!
//! The bridge keeps ingesting at full rate no matter what viewers do: a
//! saturated session loses only its own oldest events, a disconnect frees
//! its registry slot immediately, and a late joiner starts from its
//! subscription point.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use fleet_gateway::BroadcastHub;
    use fleet_ingestion::IngestionBridge;
    use fleet_runtime::adapters::HubSink;
    use fleet_store::EventStore;
    use fleet_types::PushEvent;

    const DATA_TOPIC: &str = "cars/data";

    fn telemetry_json(speed: f64) -> String {
        format!(
            r#"{{"car_id":"car_01","speed":{speed},"engine_temp":95.0,"speed_diff":0.1,"temp_normalized":0.375}}"#
        )
    }

    fn speed_of(event: &PushEvent) -> f64 {
        match event {
            PushEvent::CarData(e) => e.speed,
            PushEvent::AnomalyData(_) => unreachable!(),
        }
    }

    fn pipeline(queue_capacity: usize) -> (Arc<EventStore>, Arc<BroadcastHub>, IngestionBridge) {
        let store = Arc::new(EventStore::new(100, 100));
        let hub = Arc::new(BroadcastHub::new(queue_capacity));
        let bridge = IngestionBridge::new(
            Arc::clone(&store),
            Arc::new(HubSink::new(Arc::clone(&hub))),
            DATA_TOPIC,
            "cars/anomalies",
        );
        (store, hub, bridge)
    }

    #[tokio::test]
    async fn test_slow_viewer_never_slows_ingest_or_peers() {
        let (store, hub, bridge) = pipeline(4);
        let mut slow = hub.open_session();
        let mut fast = hub.open_session();

        // Fast viewer drains every event; slow viewer reads nothing.
        for speed in 1..=10 {
            bridge
                .handle_message(DATA_TOPIC, telemetry_json(f64::from(speed)).as_bytes())
                .unwrap();
            let got = timeout(Duration::from_millis(100), fast.next())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(speed_of(&got), f64::from(speed));
        }

        // Ingest was never throttled: the store holds all ten readings.
        assert_eq!(store.lens(), (10, 0));

        // The slow viewer lost exactly its overflow and resumes in order.
        let got = timeout(Duration::from_millis(100), slow.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(speed_of(&got), 7.0);
        assert_eq!(slow.dropped_events(), 6);
        assert_eq!(fast.dropped_events(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_mid_stream_frees_slot_and_peers_continue() {
        let (_store, hub, bridge) = pipeline(64);
        let leaver = hub.open_session();
        let mut stayer = hub.open_session();
        assert_eq!(hub.session_count(), 2);

        bridge
            .handle_message(DATA_TOPIC, telemetry_json(1.0).as_bytes())
            .unwrap();
        drop(leaver);
        assert_eq!(hub.session_count(), 1);

        bridge
            .handle_message(DATA_TOPIC, telemetry_json(2.0).as_bytes())
            .unwrap();

        for expected in [1.0, 2.0] {
            let got = timeout(Duration::from_millis(100), stayer.next())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(speed_of(&got), expected);
        }
    }

    #[tokio::test]
    async fn test_late_joiner_starts_from_subscription_point() {
        let (store, hub, bridge) = pipeline(64);

        bridge
            .handle_message(DATA_TOPIC, telemetry_json(1.0).as_bytes())
            .unwrap();

        // The earlier reading is only reachable through the store snapshot.
        let mut late = hub.open_session();
        bridge
            .handle_message(DATA_TOPIC, telemetry_json(2.0).as_bytes())
            .unwrap();

        let got = timeout(Duration::from_millis(100), late.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(speed_of(&got), 2.0);
        assert_eq!(store.telemetry_snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_counter_tracks_every_ingested_event() {
        let (_store, hub, bridge) = pipeline(64);
        // No sessions at all: dispatch is still counted, never an error.
        for speed in 1..=3 {
            bridge
                .handle_message(DATA_TOPIC, telemetry_json(f64::from(speed)).as_bytes())
                .unwrap();
        }
        assert_eq!(hub.events_dispatched(), 3);
        assert_eq!(hub.session_count(), 0);
    }
}
