//! HTTP routes: query endpoint, health, and the viewer WebSocket.

use crate::hub::BroadcastHub;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use fleet_store::EventStore;
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
    pub hub: Arc<BroadcastHub>,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/data", get(get_data))
        .route("/health", get(get_health))
        .route("/ws", get(ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /data` — stateless snapshot of both buffers, insertion order.
async fn get_data(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "car_data": state.store.telemetry_snapshot(),
        "anomalies": state.store.anomaly_snapshot(),
    }))
}

/// `GET /health` — liveness plus buffer and session counts.
async fn get_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (telemetry, anomalies) = state.store.lens();
    Json(json!({
        "status": "ok",
        "buffered_telemetry": telemetry,
        "buffered_anomalies": anomalies,
        "viewer_sessions": state.hub.session_count(),
        "events_dispatched": state.hub.events_dispatched(),
    }))
}

/// `GET /ws` — upgrade to a live viewer session.
async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Pump hub events to the socket until either side closes.
///
/// Dropping the session at the end of this function removes it from the
/// registry; a closed or errored socket is never resurrected.
async fn handle_socket(socket: WebSocket, hub: Arc<BroadcastHub>) {
    let mut session = hub.open_session();
    let session_id = session.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(session_id = %session_id, "Viewer connected");

    loop {
        tokio::select! {
            event = session.next() => {
                let Some(event) = event else {
                    // Hub gone: the pipeline is shutting down.
                    break;
                };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(session_id = %session_id, error = %e, "Push event encode failed");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if ws_tx.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {
                    // Viewers are read-only; inbound frames are ignored.
                }
                Some(Err(e)) => {
                    warn!(session_id = %session_id, error = %e, "Viewer socket error");
                    break;
                }
            }
        }
    }

    info!(
        session_id = %session_id,
        dropped = session.dropped_events(),
        "Viewer disconnected"
    );
}
