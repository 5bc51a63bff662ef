//! Event bus carrying simulation events to the presentation layer.
//!
//! The simulation never calls into rendering or effects directly; it
//! publishes events here and the cosmetic layer (particles, tracers,
//! health bars, audio) drains them once per frame. A headless run drains
//! and drops.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use vanguard_common::{EntityId, Vec2};

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Actor spawned into the world
    ActorSpawned {
        /// Actor ID
        entity: EntityId,
        /// Spawn position
        position: Vec2,
    },
    /// Actor removed from the world
    ActorDespawned {
        /// Actor ID
        entity: EntityId,
    },
    /// An attack ray was fired
    WeaponFired {
        /// Attacking actor
        attacker: EntityId,
        /// Ray origin
        from: Vec2,
        /// Range-clamped ray endpoint
        to: Vec2,
    },
    /// An attack connected
    ActorHit {
        /// Actor that was hit
        target: EntityId,
        /// Attacking actor
        source: EntityId,
        /// World position of the hit
        point: Vec2,
        /// Knockback impulse applied
        knockback: Vec2,
        /// Health removed
        damage: f32,
    },
    /// An actor's health was depleted
    ActorDied {
        /// Actor that died
        entity: EntityId,
    },
}

/// Event bus for broadcasting simulation events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    ///
    /// Non-blocking: if the bus is full the event is dropped, since
    /// cosmetic consumers are best-effort.
    pub fn publish(&self, event: GameEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(16);
        bus.publish(GameEvent::ActorDied {
            entity: EntityId::from_raw(1),
        });
        bus.publish(GameEvent::ActorDespawned {
            entity: EntityId::from_raw(2),
        });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(bus.pending_count(), 0);
        assert_eq!(
            events[0],
            GameEvent::ActorDied {
                entity: EntityId::from_raw(1)
            }
        );
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        bus.publish(GameEvent::ActorDespawned {
            entity: EntityId::from_raw(1),
        });
        bus.publish(GameEvent::ActorDespawned {
            entity: EntityId::from_raw(2),
        });

        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_event_serialization_round_trip() {
        // Events cross into scripting/replay tooling as JSON.
        let event = GameEvent::ActorHit {
            target: EntityId::from_raw(5),
            source: EntityId::from_raw(6),
            point: Vec2::new(1.5, -2.5),
            knockback: Vec2::new(0.1, 0.0),
            damage: 10.0,
        };

        let json = serde_json::to_string(&event).expect("event should serialize");
        let back: GameEvent = serde_json::from_str(&json).expect("event should deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_extra_sender_handle() {
        let bus = EventBus::new(16);
        let sender = bus.sender();
        sender
            .try_send(GameEvent::ActorDied {
                entity: EntityId::from_raw(3),
            })
            .expect("bus has room");

        assert_eq!(bus.drain().len(), 1);
    }
}
