//! # Generation Events
//!
//! Pending events produced by the map graph for collaborators to drain.
//!
//! Room-activation and camera systems react to entities crossing open
//! doors. Rather than scattering callbacks, the generator queues events and
//! callers drain them each tick.

use crate::map::{DoorId, EntityId, Sector};
use serde::{Deserialize, Serialize};

/// An entity crossed an open door into a new sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntered {
    /// Sector of the room the entity ended up in.
    pub sector: Sector,
    /// The crossing entity.
    pub entity: EntityId,
    /// The door that was crossed.
    pub door: DoorId,
}

/// FIFO queue of pending events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQueue {
    pending: Vec<RoomEntered>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event.
    pub fn push(&mut self, event: RoomEntered) {
        self.pending.push(event);
    }

    /// Takes all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<RoomEntered> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops all pending events.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
