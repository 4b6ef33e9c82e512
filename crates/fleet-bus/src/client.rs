//! The MQTT bus client and its receive loop.

use crate::{Backoff, BusError, DEFAULT_KEEP_ALIVE_SECS, DEFAULT_REQUEST_CAPACITY};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt made yet.
    Disconnected,
    /// Waiting for the initial CONNACK.
    Connecting,
    /// Session established.
    Connected,
    /// Lost the session; polling with backoff until the broker answers.
    Reconnecting,
    /// Terminal. The client unsubscribed and disconnected.
    Shutdown,
}

/// Options for establishing a broker session.
#[derive(Debug, Clone)]
pub struct BusOptions {
    /// Broker hostname or IP.
    pub host: String,
    /// Broker port (1883 for plain MQTT).
    pub port: u16,
    /// Client identifier; must be unique per consumer on the broker.
    pub client_id: String,
    /// Delivery assurance negotiated for subscriptions and publishes.
    pub qos: QoS,
    /// Timeout for the initial connect only; steady-state receive never
    /// times out.
    pub connect_timeout: Duration,
    /// Keep-alive interval.
    pub keep_alive: Duration,
}

impl BusOptions {
    /// Options for a public test broker with sane defaults.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, client_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: client_id.into(),
            qos: QoS::AtMostOnce,
            connect_timeout: Duration::from_secs(10),
            keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
        }
    }

    fn to_mqtt_options(&self) -> MqttOptions {
        let mut opts = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        opts.set_keep_alive(self.keep_alive);
        opts.set_clean_session(true);
        opts
    }
}

/// Map a numeric QoS level (as found in configuration) to the protocol enum.
#[must_use]
pub fn qos_from_level(level: u8) -> QoS {
    match level {
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtMostOnce,
    }
}

/// One inbound message as delivered by the broker.
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// Topic the message arrived on.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

/// Cheap clonable handle for fire-and-forget publishing.
///
/// Publish failures are logged and swallowed: the bus contract is
/// best-effort, and a full request queue must never stall the caller.
#[derive(Clone)]
pub struct BusPublisher {
    client: AsyncClient,
    qos: QoS,
}

impl BusPublisher {
    /// Enqueue a publish without blocking.
    pub fn publish(&self, topic: &str, payload: Vec<u8>) {
        if let Err(e) = self.client.try_publish(topic, self.qos, false, payload) {
            warn!(topic, error = %e, "Publish dropped");
        }
    }
}

/// An MQTT client owning its connection lifecycle.
///
/// Each consumer (ingestion bridge, scorer adapter) constructs its own
/// `BusClient` with a distinct client id; the two receive loops run in
/// parallel against the same upstream topics.
pub struct BusClient {
    client: AsyncClient,
    event_loop: EventLoop,
    qos: QoS,
    /// Desired subscriptions, replayed after every reconnect.
    topics: Vec<String>,
    state: ConnectionState,
    backoff: Backoff,
    shutdown: watch::Receiver<bool>,
}

impl BusClient {
    /// Connect to the broker, waiting up to `options.connect_timeout` for
    /// the initial CONNACK.
    ///
    /// The `shutdown` receiver unblocks a pending [`recv`](Self::recv) and
    /// drives the terminal `Shutdown` transition.
    pub async fn connect(
        options: BusOptions,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, BusError> {
        let timeout = options.connect_timeout;
        let client_id = options.client_id.clone();
        let (client, mut event_loop) =
            AsyncClient::new(options.to_mqtt_options(), DEFAULT_REQUEST_CAPACITY);

        debug!(client_id = %client_id, host = %options.host, port = options.port, "Connecting to broker");

        tokio::time::timeout(timeout, Self::await_connack(&mut event_loop))
            .await
            .map_err(|_| BusError::ConnectTimeout(timeout))??;

        info!(client_id = %client_id, "Connected to broker");

        Ok(Self {
            client,
            event_loop,
            qos: options.qos,
            topics: Vec::new(),
            state: ConnectionState::Connected,
            backoff: Backoff::default(),
            shutdown,
        })
    }

    async fn await_connack(event_loop: &mut EventLoop) -> Result<(), BusError> {
        loop {
            match event_loop.poll().await? {
                Event::Incoming(Packet::ConnAck(_)) => return Ok(()),
                other => debug!(event = ?other, "Pre-CONNACK event ignored"),
            }
        }
    }

    /// Subscribe to the given topics at the configured QoS.
    ///
    /// Idempotent: topics already subscribed are skipped, and the full set
    /// is re-issued automatically after every reconnect.
    pub async fn subscribe(&mut self, topics: &[&str]) -> Result<(), BusError> {
        if self.state == ConnectionState::Shutdown {
            return Err(BusError::Shutdown);
        }
        for topic in topics {
            if self.topics.iter().any(|t| t == topic) {
                continue;
            }
            self.client.subscribe(*topic, self.qos).await?;
            self.topics.push((*topic).to_string());
            info!(topic, qos = ?self.qos, "Subscribed");
        }
        Ok(())
    }

    /// A handle for publishing from this client's session.
    #[must_use]
    pub fn publisher(&self) -> BusPublisher {
        BusPublisher {
            client: self.client.clone(),
            qos: self.qos,
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Topics this client is subscribed to.
    #[must_use]
    pub fn subscribed_topics(&self) -> &[String] {
        &self.topics
    }

    /// Await the next inbound message.
    ///
    /// Returns `None` once shutdown is signalled; any transport error flips
    /// the state to `Reconnecting` and the loop keeps polling with capped
    /// exponential backoff until the broker answers again.
    pub async fn recv(&mut self) -> Option<BusMessage> {
        loop {
            if *self.shutdown.borrow() {
                self.close().await;
                return None;
            }

            tokio::select! {
                changed = self.shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *self.shutdown.borrow() {
                        self.close().await;
                        return None;
                    }
                }
                polled = self.event_loop.poll() => match polled {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        return Some(BusMessage {
                            topic: publish.topic,
                            payload: publish.payload.to_vec(),
                        });
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => self.on_connack(),
                    Ok(_) => {}
                    Err(e) => {
                        let delay = self.on_transport_error(&e);
                        if self.sleep_or_shutdown(delay).await {
                            self.close().await;
                            return None;
                        }
                    }
                }
            }
        }
    }

    /// CONNACK while receiving: when recovering from an outage, replay the
    /// desired subscriptions, then settle into `Connected` and restart the
    /// backoff schedule.
    fn on_connack(&mut self) {
        if self.state == ConnectionState::Reconnecting {
            info!("Reconnected to broker");
            self.resubscribe();
        }
        self.state = ConnectionState::Connected;
        self.backoff.reset();
    }

    /// Record a transport failure and return the delay before the next poll.
    fn on_transport_error(&mut self, error: &rumqttc::ConnectionError) -> Duration {
        self.state = ConnectionState::Reconnecting;
        let delay = self.backoff.next_delay();
        warn!(error = %error, retry_in = ?delay, "Broker connection lost");
        delay
    }

    /// Sleep the backoff delay, returning true if shutdown arrived first.
    async fn sleep_or_shutdown(&mut self, delay: Duration) -> bool {
        tokio::select! {
            () = tokio::time::sleep(delay) => false,
            changed = self.shutdown.changed() => {
                changed.is_err() || *self.shutdown.borrow()
            }
        }
    }

    /// Re-issue the desired subscriptions after a reconnect.
    fn resubscribe(&self) {
        for topic in &self.topics {
            if let Err(e) = self.client.try_subscribe(topic, self.qos) {
                warn!(topic, error = %e, "Resubscribe failed");
            }
        }
    }

    /// Terminal shutdown: unsubscribe, then disconnect.
    async fn close(&mut self) {
        if self.state == ConnectionState::Shutdown {
            return;
        }
        self.state = ConnectionState::Shutdown;

        for topic in &self.topics {
            if let Err(e) = self.client.unsubscribe(topic).await {
                debug!(topic, error = %e, "Unsubscribe on shutdown failed");
            }
        }
        if let Err(e) = self.client.disconnect().await {
            debug!(error = %e, "Disconnect on shutdown failed");
        }
        info!("Bus client shut down");
    }
}
