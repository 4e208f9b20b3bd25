//! The single entity representation and its closed set of behaviours.

mod bullet;
mod monkey;
mod player;

pub use bullet::Bullet;
pub use monkey::Monkey;
pub use player::{Player, PlayerInputs, PlayerTuning};

use glam::Vec3;
use monkeyshot_common::{EntityId, EntityKind, Pose, VisualHandle};

use crate::collider::Collider;
use crate::event::EventSink;
use crate::object::GameObject;
use crate::visual::VisualSink;

/// Per-kind state layered on top of [`GameObject`].
#[derive(Debug, Clone)]
pub enum Behavior {
    Player(Player),
    Monkey(Monkey),
    Bullet(Bullet),
    /// Static geometry; never moves, never renders per frame.
    Building,
    /// Short-lived particle whose look follows its life fraction.
    Spark,
}

#[derive(Debug, Clone)]
pub struct Entity {
    object: GameObject,
    behavior: Behavior,
}

impl Entity {
    pub fn player(pose: Pose, tuning: PlayerTuning) -> Self {
        Self {
            object: GameObject::new(EntityKind::Player, pose)
                .with_collider(Collider::sphere(tuning.radius)),
            behavior: Behavior::Player(Player::new(tuning)),
        }
    }

    /// `speed` in units per second along `pose.yaw`, `spin` in radians per second.
    pub fn monkey(pose: Pose, radius: f32, speed: f32, spin: f32) -> Self {
        Self {
            object: GameObject::new(EntityKind::Monkey, pose)
                .with_collider(Collider::sphere(radius)),
            behavior: Behavior::Monkey(Monkey::new(pose.yaw, speed, spin)),
        }
    }

    pub fn bullet(pose: Pose, speed: f32, duration_ms: f32, radius: f32) -> Self {
        Self {
            object: GameObject::new(EntityKind::Bullet, pose)
                .with_collider(Collider::sphere(radius))
                .with_duration(duration_ms),
            behavior: Behavior::Bullet(Bullet::new(pose.yaw, speed)),
        }
    }

    /// Square footprint of `width`, standing `height` tall around `center`.
    pub fn building(center: Vec3, width: f32, height: f32) -> Self {
        Self {
            object: GameObject::new(EntityKind::Building, Pose::new(center, 0.0))
                .with_collider(Collider::aabb(width, width, height)),
            behavior: Behavior::Building,
        }
    }

    pub fn spark(position: Vec3, duration_ms: f32) -> Self {
        Self {
            object: GameObject::new(EntityKind::Spark, Pose::new(position, 0.0))
                .with_duration(duration_ms),
            behavior: Behavior::Spark,
        }
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.object = self.object.with_visual(visual);
        self
    }

    pub fn object(&self) -> &GameObject {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }

    pub fn id(&self) -> EntityId {
        self.object.id()
    }

    pub fn kind(&self) -> EntityKind {
        self.object.kind()
    }

    pub fn position(&self) -> Vec3 {
        self.object.position
    }

    pub fn yaw(&self) -> f32 {
        self.object.yaw
    }

    pub fn collider(&self) -> Option<&Collider> {
        self.object.collider()
    }

    pub fn visual(&self) -> Option<VisualHandle> {
        self.object.visual()
    }

    pub fn is_alive(&self) -> bool {
        self.object.is_alive()
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.behavior {
            Behavior::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Advance by `dt_ms` milliseconds. False means the entity is dead and
    /// should be evicted by its owner.
    pub fn update(&mut self, dt_ms: f32, sink: &mut impl EventSink) -> bool {
        match &mut self.behavior {
            Behavior::Player(p) => p.update(&mut self.object, dt_ms, sink),
            Behavior::Monkey(m) => m.update(&mut self.object, dt_ms, sink),
            Behavior::Bullet(b) => b.update(&mut self.object, dt_ms, sink),
            Behavior::Building | Behavior::Spark => self.object.advance(dt_ms, sink),
        }
    }

    pub fn render(&self, out: &mut impl VisualSink) {
        match self.behavior {
            Behavior::Building => {}
            Behavior::Spark => {
                self.object.render(out);
                if let (Some(handle), Some(fraction)) =
                    (self.object.visual(), self.object.life_fraction())
                {
                    let (scale, opacity) = spark_appearance(fraction);
                    out.set_scale(handle, scale);
                    out.set_opacity(handle, opacity);
                }
            }
            _ => self.object.render(out),
        }
    }

    pub fn snuff(&mut self, sink: &mut impl EventSink) -> bool {
        self.object.snuff(sink)
    }

    pub fn kill(&mut self, sink: &mut impl EventSink) -> bool {
        self.object.kill(sink)
    }
}

/// Scale and opacity of a spark at the given share of its life.
///
/// Grows from 1x to 4x while fading from 0.75 to fully transparent.
pub fn spark_appearance(life_fraction: f32) -> (f32, f32) {
    let f = life_fraction.clamp(0.0, 1.0);
    (1.0 + 3.0 * f, 0.75 * (1.0 - f))
}
