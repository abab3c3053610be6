//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use super::{InteractionEvent, LootEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Topic {
    /// Token lifecycle and container-state changes.
    Interaction,
    /// Pickup and currency announcements.
    Loot,
}

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    Interaction(InteractionEvent),
    Loot(LootEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Interaction(_) => Topic::Interaction,
            Event::Loot(_) => Topic::Loot,
        }
    }
}

/// Topic-based event bus.
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Publishing is best-effort: events without subscribers vanish.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a bus with the specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Interaction, broadcast::channel(capacity).0);
        channels.insert(Topic::Loot, broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publishes an event to its topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        let tx = &self.channels[&topic];
        if tx.send(event).is_err() {
            // No subscribers for this topic; normal, not an error.
            tracing::trace!(target: "loot::events", ?topic, "no subscribers for topic");
        }
    }

    /// Subscribes to a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[&topic].subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
