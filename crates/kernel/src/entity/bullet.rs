use glam::Vec2;
use monkeyshot_common::heading;

use crate::event::EventSink;
use crate::object::GameObject;

/// Straight-line projectile; its lifespan lives on the object.
#[derive(Debug, Clone)]
pub struct Bullet {
    velocity: Vec2,
}

impl Bullet {
    pub fn new(yaw: f32, speed: f32) -> Self {
        Self {
            velocity: heading(yaw) * speed,
        }
    }

    pub(crate) fn update(
        &mut self,
        object: &mut GameObject,
        dt_ms: f32,
        sink: &mut impl EventSink,
    ) -> bool {
        if !object.advance(dt_ms, sink) {
            return false;
        }
        let ft = dt_ms / 1000.0;
        object.position.x += self.velocity.x * ft;
        object.position.y += self.velocity.y * ft;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::Entity;
    use crate::event::{EventKind, GameEvent};
    use glam::Vec3;
    use monkeyshot_common::{EntityKind, Pose};

    #[test]
    fn bullet_travels_then_expires() {
        let mut b = Entity::bullet(Pose::new(Vec3::ZERO, 0.0), 30.0, 2000.0, 0.5);
        let mut events: Vec<GameEvent> = Vec::new();
        for _ in 0..19 {
            assert!(b.update(100.0, &mut events));
        }
        assert!((b.position().x - 57.0).abs() < 1e-3);
        assert!(!b.update(100.0, &mut events));
        // the expiring step does not move it
        assert!((b.position().x - 57.0).abs() < 1e-3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Snuff);
        assert_eq!(events[0].sender_kind, EntityKind::Bullet);
    }
}
