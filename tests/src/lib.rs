//! # Fleetwatch Test Suite
//!
//! Unified test crate for cross-crate choreography: flows that span the
//! ingestion bridge, the bounded store, the scorer adapter, and the
//! gateway's broadcast hub.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── pipeline.rs      # Bridge → store → hub → scorer → verdict loop
//!     └── backpressure.rs  # Slow-viewer isolation and session lifecycle
//! ```
//!
//! Per-crate unit tests live next to the code they cover; everything here
//! needs at least two crates wired together.
//!
//! ```bash
//! cargo test -p fleetwatch-tests
//! ```

#![allow(dead_code)]

pub mod integration;
