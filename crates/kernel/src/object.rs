use glam::Vec3;
use monkeyshot_common::{EntityId, EntityKind, Pose, VisualHandle};

use crate::collider::Collider;
use crate::event::{EventKind, EventSink, GameEvent};
use crate::visual::VisualSink;

/// State and lifecycle shared by every entity.
///
/// `Alive --(duration elapsed | snuff | kill)--> Dead`. Dead is terminal.
/// Behaviours call the functions here explicitly before adding their own
/// motion; nothing is inherited implicitly.
#[derive(Debug, Clone)]
pub struct GameObject {
    id: EntityId,
    kind: EntityKind,
    pub position: Vec3,
    pub yaw: f32,
    collider: Option<Collider>,
    life_elapsed: f32,
    duration: Option<f32>,
    alive: bool,
    visual: Option<VisualHandle>,
}

impl GameObject {
    pub fn new(kind: EntityKind, pose: Pose) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            position: pose.position,
            yaw: pose.yaw,
            collider: None,
            life_elapsed: 0.0,
            duration: None,
            alive: true,
            visual: None,
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Lifespan in milliseconds. Panics unless positive and finite.
    pub fn with_duration(mut self, duration_ms: f32) -> Self {
        assert!(
            duration_ms.is_finite() && duration_ms > 0.0,
            "duration must be positive, got {duration_ms}"
        );
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.yaw)
    }

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Milliseconds accumulated since creation.
    pub fn life_elapsed(&self) -> f32 {
        self.life_elapsed
    }

    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    /// Elapsed share of the lifespan, `None` for entities that never expire.
    pub fn life_fraction(&self) -> Option<f32> {
        self.duration.map(|d| self.life_elapsed / d)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    /// Base update. Returns false once the object is dead, snuffing it first
    /// if this step exhausts its duration.
    pub fn advance(&mut self, dt_ms: f32, sink: &mut impl EventSink) -> bool {
        if !self.alive {
            return false;
        }
        self.life_elapsed += dt_ms;
        if let Some(duration) = self.duration {
            if self.life_elapsed >= duration {
                self.snuff(sink);
                return false;
            }
        }
        true
    }

    /// Copy position and yaw into the attached visual, if any.
    pub fn render(&self, out: &mut impl VisualSink) {
        if let Some(handle) = self.visual {
            out.set_transform(handle, self.position, self.yaw);
        }
    }

    /// End this object's life. Returns whether the transition happened.
    pub fn snuff(&mut self, sink: &mut impl EventSink) -> bool {
        if !self.alive {
            return false;
        }
        sink.emit(self.event(EventKind::Snuff));
        self.alive = false;
        true
    }

    /// Violently end this object's life: `Kill`, then `Snuff`.
    pub fn kill(&mut self, sink: &mut impl EventSink) -> bool {
        if !self.alive {
            return false;
        }
        sink.emit(self.event(EventKind::Kill));
        self.snuff(sink)
    }

    pub fn event(&self, kind: EventKind) -> GameEvent {
        GameEvent {
            kind,
            sender: self.id,
            sender_kind: self.kind,
            position: self.position,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_life_elapsed(&mut self, elapsed_ms: f32) {
        self.life_elapsed = elapsed_ms;
    }
}
