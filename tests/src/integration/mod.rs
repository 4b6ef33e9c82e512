//! Cross-crate integration flows.

pub mod backpressure;
pub mod pipeline;
