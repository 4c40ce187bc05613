//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{SessionEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session lifecycle (start, phase changes)
    Session,
    /// Per-turn results (committed, rejected, aborted)
    Turn,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Session, Topic::Turn];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Turn(TurnEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Turn(_) => Topic::Turn,
        }
    }
}

impl From<SessionEvent> for Event {
    fn from(event: SessionEvent) -> Self {
        Event::Session(event)
    }
}

impl From<TurnEvent> for Event {
    fn from(event: TurnEvent) -> Self {
        Event::Turn(event)
    }
}

/// Topic-based event bus
///
/// The channel map is fixed at construction, so publishing and subscribing
/// never contend on a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        match self.channels.get(&topic) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    // No subscribers for this topic - this is normal, not an error
                    tracing::trace!("No subscribers for topic {:?}", topic);
                }
            }
            None => tracing::debug!("No channel registered for topic {:?}", topic),
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is registered in `with_capacity`; a detached
            // receiver reports the channel as closed.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use game_core::{ActionToken, GamePhase, Outcome};

    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut session_rx = bus.subscribe(Topic::Session);
        let mut turn_rx = bus.subscribe(Topic::Turn);

        bus.publish(TurnEvent::ActionRejected {
            token: ActionToken::North,
            reason: "That way is blocked.".into(),
            code: "ACTION_BLOCKED".into(),
        });
        bus.publish(SessionEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::GameOver,
            outcome: Outcome::Death,
        });

        assert!(matches!(
            turn_rx.recv().await.unwrap(),
            Event::Turn(TurnEvent::ActionRejected { .. })
        ));
        assert!(matches!(
            session_rx.recv().await.unwrap(),
            Event::Session(SessionEvent::PhaseChanged { .. })
        ));
        assert!(turn_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(TurnEvent::TurnAborted {
            token: ActionToken::Wait,
            error: "registry".into(),
            code: "STATE_OCCUPANCY_DESYNC".into(),
        });
        let receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 2);
    }
}
