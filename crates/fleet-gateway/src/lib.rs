//! # Fleet Gateway - Live Push and Query Surface
//!
//! External read interface of the pipeline:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    GATEWAY                          │
//! ├─────────────────────────────────────────────────────┤
//! │  GET /data     → snapshot of both bounded buffers   │
//! │  GET /ws       → viewer session (live push)         │
//! │  GET /health   → liveness + session/buffer counts   │
//! └──────────────────────────┬──────────────────────────┘
//!                            │
//!                     Broadcast Hub ←── dispatch() from the bridge
//! ```
//!
//! Dispatch never blocks on a slow or dead viewer: each session owns a
//! bounded queue, and a saturated session loses its own oldest entries
//! without affecting delivery to other sessions.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod hub;
pub mod routes;
pub mod server;

pub use hub::{BroadcastHub, ViewerSession, DEFAULT_VIEWER_QUEUE_CAPACITY};
pub use routes::{router, AppState};
pub use server::serve;
