//! Pipeline wiring and lifecycle management.

use crate::adapters::HubSink;
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use fleet_bus::BusClient;
use fleet_gateway::{AppState, BroadcastHub};
use fleet_ingestion::IngestionBridge;
use fleet_scoring::{BusVerdictSink, MeanBaselineScorer, ScorerConfig, ScorerService};
use fleet_store::EventStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

/// The runtime orchestrating all pipeline tasks.
pub struct FleetRuntime {
    config: RuntimeConfig,
    store: Arc<EventStore>,
    hub: Arc<BroadcastHub>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver, cloned into every long-lived task.
    shutdown_rx: watch::Receiver<bool>,
}

impl FleetRuntime {
    /// Create a runtime from validated configuration.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        let store = Arc::new(EventStore::new(
            config.buffer_capacity,
            config.buffer_capacity,
        ));
        let hub = Arc::new(BroadcastHub::new(config.viewer_queue_capacity));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            store,
            hub,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Connect to the broker and spawn every long-lived task.
    ///
    /// The ingestion bridge and the scorer adapter are independent bus
    /// consumers: each gets its own client session and receive loop, both
    /// subscribed to the same upstream telemetry topic.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Fleetwatch Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        self.start_ingestion().await?;
        self.start_scorer().await?;
        self.start_gateway();

        info!(
            broker = %self.config.broker_host,
            data_topic = %self.config.data_topic,
            anomaly_topic = %self.config.anomaly_topic,
            http = %self.config.http_addr(),
            "All pipeline tasks running"
        );
        Ok(())
    }

    async fn start_ingestion(&self) -> Result<()> {
        let mut bus = BusClient::connect(
            self.config.bus_options("dashboard"),
            self.shutdown_rx.clone(),
        )
        .await
        .context("ingestion bus connect failed")?;
        bus.subscribe(&[&self.config.data_topic, &self.config.anomaly_topic])
            .await
            .context("ingestion subscribe failed")?;

        let bridge = IngestionBridge::new(
            Arc::clone(&self.store),
            Arc::new(HubSink::new(Arc::clone(&self.hub))),
            self.config.data_topic.clone(),
            self.config.anomaly_topic.clone(),
        );
        tokio::spawn(bridge.run(bus));
        Ok(())
    }

    async fn start_scorer(&self) -> Result<()> {
        let mut bus = BusClient::connect(
            self.config.bus_options("scorer"),
            self.shutdown_rx.clone(),
        )
        .await
        .context("scorer bus connect failed")?;
        bus.subscribe(&[&self.config.data_topic])
            .await
            .context("scorer subscribe failed")?;

        let sink = BusVerdictSink::new(bus.publisher(), self.config.anomaly_topic.clone());
        let scorer_config = ScorerConfig {
            threshold: self.config.anomaly_threshold,
            ..ScorerConfig::default()
        };
        let service = ScorerService::new(
            scorer_config,
            Arc::new(MeanBaselineScorer),
            Arc::new(sink),
        )
        .context("scorer configuration rejected")?;
        tokio::spawn(service.run(bus));
        Ok(())
    }

    fn start_gateway(&self) {
        let state = AppState {
            store: Arc::clone(&self.store),
            hub: Arc::clone(&self.hub),
        };
        let addr = self.config.http_addr();
        let shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            if let Err(e) = fleet_gateway::serve(addr, state, shutdown).await {
                error!(error = %e, "Gateway server failed");
            }
        });
    }

    /// Signal shutdown and let in-flight work drain.
    ///
    /// Each receive loop unsubscribes, disconnects, and finishes the
    /// message it is handling before exiting, so no event is scored twice
    /// across the shutdown race.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!(error = %e, "Failed to send shutdown signal");
        }

        // Give the receive loops and dispatcher time to drain.
        tokio::time::sleep(Duration::from_secs(2)).await;

        info!("Shutdown complete");
    }

    /// The shared event store.
    #[must_use]
    pub fn store(&self) -> Arc<EventStore> {
        Arc::clone(&self.store)
    }

    /// The broadcast hub.
    #[must_use]
    pub fn hub(&self) -> Arc<BroadcastHub> {
        Arc::clone(&self.hub)
    }
}
