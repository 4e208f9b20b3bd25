use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(8);
        s
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// The closed set of entity behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Monkey,
    Bullet,
    Building,
    Spark,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Monkey => "monkey",
            Self::Bullet => "bullet",
            Self::Building => "building",
            Self::Spark => "spark",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque reference to an externally rendered object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Position plus yaw (radians about +Z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

/// Unit direction in the XY plane for a yaw angle.
pub fn heading(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), yaw.sin())
}

/// Wrap an angle into `[0, TAU)`.
pub fn wrap_angle(a: f32) -> f32 {
    a.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_short_is_eight_chars() {
        assert_eq!(EntityId::new().short().len(), 8);
    }

    #[test]
    fn heading_decomposes_yaw() {
        let h = heading(0.0);
        assert!((h - Vec2::X).length() < 1e-6);
        let h = heading(FRAC_PI_2);
        assert!((h - Vec2::Y).length() < 1e-6);
        let h = heading(-FRAC_PI_2);
        assert!((h + Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn wrap_angle_is_positive() {
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * TAU + 0.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn kind_names() {
        assert_eq!(EntityKind::Monkey.to_string(), "monkey");
        assert_eq!(EntityKind::Building.name(), "building");
    }
}
