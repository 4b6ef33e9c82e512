//! # Fleetwatch Runtime
//!
//! Wires the pipeline together and owns its lifecycle:
//!
//! ```text
//! Telemetry Source → Broker → ┬→ Ingestion Bridge → Store + Hub → Viewers
//!                             └→ Scorer Adapter ──→ Broker (verdicts) ─┐
//!                                                                     │
//!                                  Ingestion Bridge ←─────────────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from environment (fatal on malformed values)
//! 3. Construct store and broadcast hub
//! 4. Connect the two bus clients (bridge, scorer)
//! 5. Spawn the receive loops and the HTTP server
//! 6. Wait for ctrl-c, then signal shutdown and drain

pub mod adapters;
pub mod config;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use runtime::FleetRuntime;
