//! HTTP server entry point.

use crate::routes::{router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Serve the gateway until the shutdown signal fires.
///
/// The query endpoint and live push keep serving whatever is already
/// buffered regardless of the broker connection state; transient bus
/// outages are never surfaced to viewers.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            loop {
                if *shutdown.borrow_and_update() {
                    break;
                }
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            info!("Gateway shutting down");
        })
        .await
}
