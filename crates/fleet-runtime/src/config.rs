//! Runtime configuration with validation.
//!
//! Every option can be overridden through a `FLEETWATCH_*` environment
//! variable. Malformed or invalid values are fatal: the process must not
//! start against a half-understood configuration.

use fleet_bus::{qos_from_level, BusOptions};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("invalid value for {var}: {value:?}")]
    Malformed { var: &'static str, value: String },

    /// A required string option is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Telemetry and anomaly topics must differ for routing to work.
    #[error("telemetry and anomaly topics must differ")]
    DuplicateTopics,

    /// A capacity or port option is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// The anomaly threshold is unusable.
    #[error("anomaly threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Broker hostname.
    pub broker_host: String,
    /// Broker port.
    pub broker_port: u16,
    /// Telemetry topic.
    pub data_topic: String,
    /// Anomaly verdict topic.
    pub anomaly_topic: String,
    /// Client id prefix; each consumer appends its own suffix.
    pub client_id: String,
    /// Delivery assurance level (0, 1 or 2).
    pub qos_level: u8,
    /// Capacity of each bounded store buffer.
    pub buffer_capacity: usize,
    /// Capacity of each viewer's outbound queue.
    pub viewer_queue_capacity: usize,
    /// Fixed anomaly threshold on the reconstruction error.
    pub anomaly_threshold: f64,
    /// HTTP bind address.
    pub http_host: IpAddr,
    /// HTTP port.
    pub http_port: u16,
    /// Timeout for the initial broker connect.
    pub connect_timeout: Duration,
    /// Session key for the web layer; passed through, unused by core logic.
    pub secret_key: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            broker_host: "broker.hivemq.com".to_string(),
            broker_port: 1883,
            data_topic: "cars/data".to_string(),
            anomaly_topic: "cars/anomalies".to_string(),
            client_id: "fleetwatch".to_string(),
            qos_level: 0,
            buffer_capacity: 100,
            viewer_queue_capacity: 256,
            anomaly_threshold: 0.05,
            http_host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            http_port: 8050,
            connect_timeout: Duration::from_secs(10),
            secret_key: "secret!".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an injectable variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("FLEETWATCH_BROKER_HOST") {
            config.broker_host = host;
        }
        if let Some(port) = lookup("FLEETWATCH_BROKER_PORT") {
            config.broker_port = parse(&port, "FLEETWATCH_BROKER_PORT")?;
        }
        if let Some(topic) = lookup("FLEETWATCH_DATA_TOPIC") {
            config.data_topic = topic;
        }
        if let Some(topic) = lookup("FLEETWATCH_ANOMALY_TOPIC") {
            config.anomaly_topic = topic;
        }
        if let Some(id) = lookup("FLEETWATCH_CLIENT_ID") {
            config.client_id = id;
        }
        if let Some(level) = lookup("FLEETWATCH_QOS") {
            config.qos_level = parse(&level, "FLEETWATCH_QOS")?;
        }
        if let Some(cap) = lookup("FLEETWATCH_BUFFER_CAPACITY") {
            config.buffer_capacity = parse(&cap, "FLEETWATCH_BUFFER_CAPACITY")?;
        }
        if let Some(cap) = lookup("FLEETWATCH_VIEWER_QUEUE_CAPACITY") {
            config.viewer_queue_capacity = parse(&cap, "FLEETWATCH_VIEWER_QUEUE_CAPACITY")?;
        }
        if let Some(threshold) = lookup("FLEETWATCH_ANOMALY_THRESHOLD") {
            config.anomaly_threshold = parse(&threshold, "FLEETWATCH_ANOMALY_THRESHOLD")?;
        }
        if let Some(host) = lookup("FLEETWATCH_HTTP_HOST") {
            config.http_host = parse(&host, "FLEETWATCH_HTTP_HOST")?;
        }
        if let Some(port) = lookup("FLEETWATCH_HTTP_PORT") {
            config.http_port = parse(&port, "FLEETWATCH_HTTP_PORT")?;
        }
        if let Some(secs) = lookup("FLEETWATCH_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout =
                Duration::from_secs(parse(&secs, "FLEETWATCH_CONNECT_TIMEOUT_SECS")?);
        }
        if let Some(secret) = lookup("FLEETWATCH_SECRET_KEY") {
            config.secret_key = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker_host.trim().is_empty() {
            return Err(ConfigError::Empty("broker host"));
        }
        if self.data_topic.trim().is_empty() {
            return Err(ConfigError::Empty("telemetry topic"));
        }
        if self.anomaly_topic.trim().is_empty() {
            return Err(ConfigError::Empty("anomaly topic"));
        }
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Empty("client id"));
        }
        if self.data_topic == self.anomaly_topic {
            return Err(ConfigError::DuplicateTopics);
        }
        if self.broker_port == 0 {
            return Err(ConfigError::Zero("broker port"));
        }
        if self.http_port == 0 {
            return Err(ConfigError::Zero("http port"));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Zero("buffer capacity"));
        }
        if self.viewer_queue_capacity == 0 {
            return Err(ConfigError::Zero("viewer queue capacity"));
        }
        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.anomaly_threshold));
        }
        Ok(())
    }

    /// Bus options for one named consumer (`dashboard`, `scorer`, ...).
    #[must_use]
    pub fn bus_options(&self, consumer: &str) -> BusOptions {
        let mut options = BusOptions::new(
            self.broker_host.clone(),
            self.broker_port,
            format!("{}-{}", self.client_id, consumer),
        );
        options.qos = qos_from_level(self.qos_level);
        options.connect_timeout = self.connect_timeout;
        options
    }

    /// HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http_host, self.http_port)
    }
}

fn parse<T: std::str::FromStr>(value: &str, var: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Malformed {
        var,
        value: value.to_string(),
    })
}
