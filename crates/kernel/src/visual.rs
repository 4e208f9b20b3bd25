use glam::Vec3;
use monkeyshot_common::VisualHandle;

/// The part of the scene collaborator that entities write into when they render.
///
/// Implementations own the visuals; entities only hold handles and copy their
/// logical state across.
pub trait VisualSink {
    fn set_transform(&mut self, handle: VisualHandle, position: Vec3, yaw: f32);
    fn set_scale(&mut self, handle: VisualHandle, scale: f32);
    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32);
}
