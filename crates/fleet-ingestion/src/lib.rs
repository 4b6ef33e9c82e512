//! # Fleet Ingestion - Bus-to-Store-to-Hub Bridge
//!
//! A single receive loop services both broker topics:
//!
//! ```text
//! ┌────────────┐   cars/data       ┌──────────────────┐
//! │   Broker   │ ────────────────→ │ Ingestion Bridge │──→ telemetry buffer
//! │            │   cars/anomalies  │  (decode, route) │──→ anomaly buffer
//! └────────────┘ ────────────────→ └────────┬─────────┘
//!                                           │ dispatch
//!                                           ▼
//!                                    Broadcast Hub → viewer sessions
//! ```
//!
//! Per-message failures are isolated to that message: a payload that fails
//! to decode is logged and dropped, and the loop keeps running. Neither
//! topic blocks processing of the other.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bridge;
pub mod error;
pub mod ports;

pub use bridge::IngestionBridge;
pub use error::DecodeError;
pub use ports::EventSink;
