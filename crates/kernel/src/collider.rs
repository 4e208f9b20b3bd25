use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shape used purely for overlap tests. Position is supplied by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { radius: f32 },
    Aabb { half_extents: Vec3 },
}

impl Collider {
    /// Panics on a negative or non-finite radius.
    pub fn sphere(radius: f32) -> Self {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "sphere radius must be finite and non-negative, got {radius}"
        );
        Self::Sphere { radius }
    }

    /// Box from full sizes along x, y and z.
    pub fn aabb(size_x: f32, size_y: f32, size_z: f32) -> Self {
        Self::aabb_half_extents(Vec3::new(size_x, size_y, size_z) * 0.5)
    }

    pub fn aabb_half_extents(half_extents: Vec3) -> Self {
        assert!(
            half_extents.is_finite() && half_extents.cmpge(Vec3::ZERO).all(),
            "box extents must be finite and non-negative, got {half_extents}"
        );
        Self::Aabb { half_extents }
    }

    /// Sphere radius, or the x half-extent of a box.
    pub fn half_width(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Aabb { half_extents } => half_extents.x,
        }
    }

    /// Overlap test between two placed shapes.
    ///
    /// Sphere pairs touch inclusively; box pairs and mixed pairs require
    /// strict penetration.
    pub fn hit(a: &Collider, a_pos: Vec3, b: &Collider, b_pos: Vec3) -> bool {
        match (*a, *b) {
            (Self::Sphere { radius: ra }, Self::Sphere { radius: rb }) => {
                a_pos.distance(b_pos) <= ra + rb
            }
            (Self::Aabb { half_extents: ha }, Self::Aabb { half_extents: hb }) => {
                (a_pos - b_pos).abs().cmplt(ha + hb).all()
            }
            (Self::Sphere { radius }, Self::Aabb { half_extents }) => {
                distance_to_aabb(a_pos, b_pos, half_extents) < radius
            }
            (Self::Aabb { half_extents }, Self::Sphere { radius }) => {
                distance_to_aabb(b_pos, a_pos, half_extents) < radius
            }
        }
    }
}

/// Distance from `point` to the nearest point of the box; zero inside it.
fn distance_to_aabb(point: Vec3, center: Vec3, half_extents: Vec3) -> f32 {
    ((point - center).abs() - half_extents)
        .max(Vec3::ZERO)
        .length()
}
