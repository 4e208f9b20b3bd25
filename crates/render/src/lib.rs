//! Rendering adapter: the scene collaborator the game talks to.
//!
//! # Invariants
//! - The scene never mutates simulation state; it only receives copies of it.
//! - Visual handles are opaque to the game. Only the scene interprets them.
//!
//! A GPU backend is out of reach here, so [`HeadlessScene`] records visual
//! state in memory and [`describe`] dumps it as text. The trait is what the
//! game depends on; swap in a real backend without changing consumers.

mod headless;
mod scene;

pub use headless::{HeadlessScene, VisualState, describe};
pub use scene::{CAMERA_HANDLE, Scene};

pub fn crate_info() -> &'static str {
    "monkeyshot-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
