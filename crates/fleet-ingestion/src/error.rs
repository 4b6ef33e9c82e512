//! Ingestion error types.

use thiserror::Error;

/// A payload that could not be promoted to a typed event.
///
/// Always non-fatal: the offending message is dropped and the receive loop
/// continues with the next one.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload was not valid JSON or was missing required fields.
    #[error("invalid payload on {topic}: {source}")]
    Payload {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub(crate) fn payload(topic: &str, source: serde_json::Error) -> Self {
        Self::Payload {
            topic: topic.to_string(),
            source,
        }
    }
}
