//! Fan-out of engine events to presentation subscribers.

use tokio::sync::broadcast;
use tracing::trace;

use crate::models::EngineEvent;

/// Events a subscriber may fall behind by before it sees `Lagged`.
const EVENT_BACKLOG: usize = 256;

/// Broadcasts [`EngineEvent`]s; every subscriber sees every event sent after it subscribed.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_backlog(EVENT_BACKLOG)
    }

    pub fn with_backlog(backlog: usize) -> Self {
        let (sender, _) = broadcast::channel(backlog);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Send `event`; returns how many subscribers received it. Without subscribers
    /// the event is dropped.
    pub fn send(&self, event: EngineEvent) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(broadcast::error::SendError(event)) => {
                trace!("No subscriber for {:?}", event);
                0
            }
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
