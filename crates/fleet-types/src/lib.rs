//! # Fleet Types Crate
//!
//! This crate contains all domain entities and wire payloads shared across
//! the fleetwatch subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutable Events**: `TelemetryEvent` and `AnomalyVerdict` are never
//!   mutated after construction; they are copied into buffers and viewer
//!   queues.
//! - **Fixed Wire Contract**: payload field names match the broker contract
//!   exactly (`car_id`, `anomaly`, `reconstruction_error`).

pub mod events;
pub mod wire;

pub use events::{AnomalyVerdict, PushEvent, TelemetryEvent};
pub use wire::{AnomalyPayload, TelemetryPayload};

/// Unix timestamp in seconds, as carried on the wire.
pub type Timestamp = i64;
