//! # Fleet Bus - MQTT Client for the Telemetry Broker
//!
//! Wraps `rumqttc` behind the contract the pipeline needs:
//!
//! - `connect` fails if the initial CONNACK does not arrive in time.
//! - `subscribe` is idempotent and replayed automatically after every
//!   reconnect.
//! - `recv` blocks until a message arrives or shutdown is signalled.
//! - `publish` is fire-and-forget, best-effort.
//!
//! ## Connection State Machine
//!
//! ```text
//! Disconnected ──connect──→ Connecting ──CONNACK──→ Connected
//!                                                      │
//!                              ┌──── I/O error ────────┘
//!                              ▼
//!                         Reconnecting ──CONNACK──→ Connected
//!                              │        (exponential backoff)
//!                              ▼
//!                          Shutdown (terminal, unsubscribes first)
//! ```
//!
//! The broker is the sole durability boundary: nothing is queued locally
//! while disconnected, so events produced during an outage are missed and
//! consumption simply resumes on reconnect.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod backoff;
pub mod client;
pub mod error;

pub use backoff::Backoff;
pub use client::{qos_from_level, BusClient, BusMessage, BusOptions, BusPublisher, ConnectionState};
pub use error::BusError;

pub use rumqttc::QoS;

/// Default request-channel capacity handed to the rumqttc client.
pub const DEFAULT_REQUEST_CAPACITY: usize = 64;

/// Default keep-alive interval negotiated with the broker.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;
