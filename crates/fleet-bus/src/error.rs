//! Bus client error types.

use thiserror::Error;

/// Errors from bus client operations.
///
/// Connection-level failures are non-fatal at steady state: the receive
/// loop absorbs them into the reconnect/backoff cycle. Only the initial
/// connect surfaces an error to the caller.
#[derive(Debug, Error)]
pub enum BusError {
    /// The broker did not acknowledge the connection in time.
    #[error("broker connect timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),

    /// Transport-level failure while talking to the broker.
    #[error("broker connection failed: {0}")]
    Connection(#[from] rumqttc::ConnectionError),

    /// The client request channel rejected an operation.
    #[error("bus client request failed: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// The client was shut down.
    #[error("bus client is shut down")]
    Shutdown,
}
