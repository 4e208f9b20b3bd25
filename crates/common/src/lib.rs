//! Shared types for the monkeyshot workspace.
//!
//! # Invariants
//! - The world is Z-up; every moving entity carries a single yaw angle about +Z.
//! - Visual handles are opaque: nothing outside the scene collaborator interprets them.

mod rng;
mod types;

pub use rng::SplitMix64;
pub use types::{EntityId, EntityKind, Pose, VisualHandle, heading, wrap_angle};

pub fn crate_info() -> &'static str {
    "monkeyshot-common v0.1.0"
}
