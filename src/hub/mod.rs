use tokio::sync::broadcast;

use crate::event::StateChangedEvent;

/// Events delivered to bridge subscribers.
#[derive(Clone, Debug)]
pub enum HubEvent {
    StateChanged(StateChangedEvent),
    /// Emitted once at process shutdown.
    Stop,
}

/// Broadcast bus carrying the hub's state-changed event stream.
///
/// Listeners receive events in emission order; a listener only sees events
/// emitted after it subscribed.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HubEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.tx.subscribe()
    }

    /// Emit a state-changed event to all listeners.
    pub fn state_changed(&self, event: StateChangedEvent) {
        let _ = self.tx.send(HubEvent::StateChanged(event));
    }

    /// Emit the distinguished stop event.
    pub fn stop(&self) {
        let _ = self.tx.send(HubEvent::Stop);
    }
}
