use glam::Vec3;
use monkeyshot_common::{Pose, VisualHandle};
use monkeyshot_kernel::VisualSink;

/// Handle every scene reserves for the camera rig.
pub const CAMERA_HANDLE: VisualHandle = VisualHandle(0);

/// Scene collaborator: creates and destroys visuals and draws frames.
///
/// Entities write their per-frame state through the [`VisualSink`]
/// supertrait. The game owns the handles it receives here and must hand each
/// one back through [`Scene::remove_visual`] when its entity is evicted.
pub trait Scene: VisualSink {
    /// A box of square footprint `width`, resting on the ground at `center.xy`.
    fn add_building(&mut self, center: Vec3, width: f32, height: f32) -> VisualHandle;
    fn add_monkey(&mut self, pose: Pose) -> VisualHandle;
    fn add_bullet(&mut self, pose: Pose) -> VisualHandle;
    fn add_spark(&mut self, position: Vec3) -> VisualHandle;
    fn remove_visual(&mut self, handle: VisualHandle);

    /// Draw one frame with everything written since the last call.
    fn render(&mut self);
    fn resize(&mut self, width: u32, height: u32);

    /// The camera rig, which the player entity drives as its visual.
    fn camera_handle(&self) -> VisualHandle {
        CAMERA_HANDLE
    }
    fn set_camera(&mut self, position: Vec3, yaw: f32);

    /// Release backend resources. Later calls are ignored.
    fn destroy(&mut self);
}
