use tokio::sync::broadcast;

use super::{PulseState, Suggestion};

/// Engine-to-UI notifications. The UI talks back through the command
/// channel, never by holding the engine, so the two layers don't own each
/// other.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    StateChanged { from: PulseState, to: PulseState },
    SuggestionReady(Suggestion),
    SuggestionDismissed,
    ExecutionError(String),
}

/// Broadcast fan-out for engine events; slow subscribers lag, they never
/// block the engine.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: EngineEvent) {
        // Send only fails when nobody is listening, which is fine
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
