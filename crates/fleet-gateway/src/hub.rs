//! The broadcast hub and viewer sessions.

use dashmap::DashMap;
use fleet_types::PushEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default per-viewer outbound queue capacity.
pub const DEFAULT_VIEWER_QUEUE_CAPACITY: usize = 256;

/// Fans newly ingested events out to every active viewer session.
///
/// Delivery runs over a bounded `broadcast` channel: `dispatch` is a
/// constant-time enqueue that never waits for any viewer, and a session
/// that falls more than the queue capacity behind loses its own oldest
/// entries (per-session backpressure) while every other session keeps
/// receiving normally.
pub struct BroadcastHub {
    sender: broadcast::Sender<PushEvent>,
    /// Active sessions by id, for bookkeeping and the health surface.
    sessions: Arc<DashMap<Uuid, Instant>>,
    /// Total events dispatched.
    dispatched: AtomicU64,
}

impl BroadcastHub {
    /// Create a hub whose viewer queues hold `queue_capacity` events.
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(queue_capacity.max(1));
        Self {
            sender,
            sessions: Arc::new(DashMap::new()),
            dispatched: AtomicU64::new(0),
        }
    }

    /// Push one event towards every active session.
    ///
    /// Returns the number of sessions the event was queued for. Never
    /// blocks; worst case is bounded by registry size times a constant-time
    /// enqueue.
    pub fn dispatch(&self, event: PushEvent) -> usize {
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        if self.sender.receiver_count() == 0 {
            return 0;
        }
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            // All receivers dropped between the check and the send.
            Err(_) => 0,
        }
    }

    /// Open a new viewer session.
    ///
    /// Sessions are never reused: a reconnecting viewer gets a fresh one.
    #[must_use]
    pub fn open_session(&self) -> ViewerSession {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Instant::now());
        debug!(session_id = %id, "Viewer session opened");

        ViewerSession {
            id,
            receiver: self.sender.subscribe(),
            sessions: Arc::clone(&self.sessions),
            dropped: 0,
        }
    }

    /// Number of active viewer sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total events dispatched since startup.
    #[must_use]
    pub fn events_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWER_QUEUE_CAPACITY)
    }
}

/// One live viewer's receiving end.
///
/// Dropped on disconnect or delivery failure, which removes the session
/// from the hub registry immediately.
pub struct ViewerSession {
    id: Uuid,
    receiver: broadcast::Receiver<PushEvent>,
    sessions: Arc<DashMap<Uuid, Instant>>,
    dropped: u64,
}

impl ViewerSession {
    /// Await the next event for this session.
    ///
    /// Returns `None` once the hub is gone. When the session has lagged,
    /// the oldest queued entries are skipped (counted in
    /// [`dropped_events`](Self::dropped_events)) and delivery resumes with
    /// the oldest retained event.
    pub async fn next(&mut self) -> Option<PushEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.dropped += count;
                    warn!(session_id = %self.id, lagged = count, "Slow viewer dropped oldest queued events");
                }
            }
        }
    }

    /// This session's identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Events this session lost to backpressure.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
        debug!(session_id = %self.id, dropped = self.dropped, "Viewer session closed");
    }
}
