//! Simulation kernel: colliders, entity lifecycle, entity behaviours and the
//! list-level helpers the orchestrator drives every frame.
//!
//! # Invariants
//! - An entity dies exactly once; `snuff` and `kill` on a dead entity are no-ops.
//! - `kill` always emits `Kill` followed by `Snuff`.
//! - Hit-testing never mutates geometry.
//! - List helpers that may remove entities iterate in reverse index order.

pub mod batch;
pub mod collider;
pub mod entity;
pub mod event;
pub mod object;
pub mod visual;

pub use batch::{render_list, test_hit, test_hit_list, test_hit_lists, update_list};
pub use collider::Collider;
pub use entity::{
    Behavior, Bullet, Entity, Monkey, Player, PlayerInputs, PlayerTuning, spark_appearance,
};
pub use event::{EventKind, EventSink, GameEvent};
pub use object::GameObject;
pub use visual::VisualSink;

pub fn crate_info() -> &'static str {
    "monkeyshot-kernel v0.1.0"
}
