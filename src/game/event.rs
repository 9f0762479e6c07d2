//! Event System
//!
//! The physics step reports contacts as events instead of calling gameplay
//! code directly. Within a frame:
//! 1. `collision::Physics::step` fills `collisions` and `headbutts`
//! 2. patrol, player and box handlers drain them in `runtime::LevelSession::tick`
//! 3. whatever is left is cleared before the next frame

use super::entity::Entity;

/// A queue for events of a single type, collected and drained within a frame.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Take every queued event, leaving the queue empty.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which face of `entity` the other entity touched.
///
/// `Bottom` means the other entity is underneath: `entity` landed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// The same contact seen from the other entity.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Two entities started touching. Sent once per perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub entity: Entity,
    pub other: Entity,
    pub side: Side,
}

/// A rising body hit the underside of a static body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadbuttEvent {
    pub entity: Entity,
    pub other: Entity,
}

pub struct Events {
    pub collisions: EventQueue<CollisionEvent>,
    pub headbutts: EventQueue<HeadbuttEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            collisions: EventQueue::new(),
            headbutts: EventQueue::new(),
        }
    }

    /// Call at end of frame.
    pub fn clear_all(&mut self) {
        self.collisions.clear();
        self.headbutts.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}
