//! Game session: builds levels, runs the per-frame loop and keeps score.
//!
//! # Invariants
//! - Only the session mutates entity collections; entities report through events.
//! - Within a frame the phases run in a fixed order: player, push-out,
//!   list updates, bullet collisions, render.
//! - Entities killed in a collision are evicted by the next frame's update.

mod clock;
mod config;
mod counters;
mod game;
pub mod level;

pub use clock::FrameClock;
pub use config::{ConfigError, GameConfig};
pub use counters::{Counters, Observable, SubscriptionId};
pub use game::Game;

pub fn crate_info() -> &'static str {
    "monkeyshot-game v0.1.0"
}
