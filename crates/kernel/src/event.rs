use glam::Vec3;
use monkeyshot_common::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// Lifecycle and gameplay notifications an entity can raise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Graceful end of life (expiry, or the last step of a kill).
    Snuff,
    /// Forceful end of life; always followed by `Snuff` from the same entity.
    Kill,
    /// The player fired. `position` is the muzzle.
    Shoot { yaw: f32 },
}

/// An event record as delivered to whoever drains the sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub sender: EntityId,
    pub sender_kind: EntityKind,
    pub position: Vec3,
}

/// Destination for events raised while entities update or die.
///
/// Entities never touch sibling collections; they emit here and the owner of
/// the collections reacts after the call returns.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
