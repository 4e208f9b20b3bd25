use glam::Vec2;
use monkeyshot_common::{heading, wrap_angle};

use crate::event::EventSink;
use crate::object::GameObject;

/// A wandering target: drifts along its initial heading and spins in place.
#[derive(Debug, Clone)]
pub struct Monkey {
    velocity: Vec2,
    /// Radians per second.
    spin: f32,
}

impl Monkey {
    pub fn new(yaw: f32, speed: f32, spin: f32) -> Self {
        Self {
            velocity: heading(yaw) * speed,
            spin,
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
        object.yaw = wrap_angle(object.yaw + self.spin * ft);
        true
    }
}
