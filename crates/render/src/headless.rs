use std::collections::BTreeMap;

use glam::Vec3;
use monkeyshot_common::{EntityKind, Pose, VisualHandle};
use monkeyshot_kernel::VisualSink;

use crate::scene::{CAMERA_HANDLE, Scene};

/// Last known state of one visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub kind: EntityKind,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Full size for buildings, zero for everything else.
    pub size: Vec3,
}

impl VisualState {
    fn new(kind: EntityKind, pose: Pose) -> Self {
        Self {
            kind,
            position: pose.position,
            yaw: pose.yaw,
            scale: 1.0,
            opacity: 1.0,
            size: Vec3::ZERO,
        }
    }
}

/// In-memory scene for tests and the CLI.
#[derive(Debug)]
pub struct HeadlessScene {
    visuals: BTreeMap<VisualHandle, VisualState>,
    next_handle: u64,
    camera: Pose,
    width: u32,
    height: u32,
    frames: u64,
    destroyed: bool,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl HeadlessScene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visuals: BTreeMap::new(),
            next_handle: CAMERA_HANDLE.0 + 1,
            camera: Pose::default(),
            width,
            height,
            frames: 0,
            destroyed: false,
        }
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualState> {
        self.visuals.get(&handle)
    }

    pub fn visuals(&self) -> impl Iterator<Item = (VisualHandle, &VisualState)> {
        self.visuals.iter().map(|(h, v)| (*h, v))
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.visuals.values().filter(|v| v.kind == kind).count()
    }

    pub fn camera(&self) -> Pose {
        self.camera
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn insert(&mut self, state: VisualState) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        if self.destroyed {
            tracing::warn!(kind = %state.kind, "scene destroyed; visual not created");
            return handle;
        }
        self.visuals.insert(handle, state);
        handle
    }
}

impl VisualSink for HeadlessScene {
    fn set_transform(&mut self, handle: VisualHandle, position: Vec3, yaw: f32) {
        if handle == CAMERA_HANDLE {
            self.camera = Pose::new(position, yaw);
        } else if let Some(v) = self.visuals.get_mut(&handle) {
            v.position = position;
            v.yaw = yaw;
        }
    }

    fn set_scale(&mut self, handle: VisualHandle, scale: f32) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.scale = scale;
        }
    }

    fn set_opacity(&mut self, handle: VisualHandle, opacity: f32) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.opacity = opacity;
        }
    }
}

impl Scene for HeadlessScene {
    fn add_building(&mut self, center: Vec3, width: f32, height: f32) -> VisualHandle {
        let position = Vec3::new(center.x, center.y, height / 2.0);
        let mut state = VisualState::new(EntityKind::Building, Pose::new(position, 0.0));
        state.size = Vec3::new(width, width, height);
        self.insert(state)
    }

    fn add_monkey(&mut self, pose: Pose) -> VisualHandle {
        self.insert(VisualState::new(EntityKind::Monkey, pose))
    }

    fn add_bullet(&mut self, pose: Pose) -> VisualHandle {
        self.insert(VisualState::new(EntityKind::Bullet, pose))
    }

    fn add_spark(&mut self, position: Vec3) -> VisualHandle {
        let mut state = VisualState::new(EntityKind::Spark, Pose::new(position, 0.0));
        state.opacity = 0.75;
        self.insert(state)
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_none() {
            tracing::trace!(handle = handle.0, "remove of unknown visual");
        }
    }

    fn render(&mut self) {
        if self.destroyed {
            tracing::warn!("scene destroyed; frame skipped");
            return;
        }
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        self.width = width;
        self.height = height;
        tracing::debug!(width, height, "scene resized");
        // a resize redraws immediately
        self.render();
    }

    fn set_camera(&mut self, position: Vec3, yaw: f32) {
        self.camera = Pose::new(position, yaw);
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.visuals.clear();
        tracing::debug!(frames = self.frames, "scene destroyed");
    }
}

/// Human-readable dump of a headless scene.
pub fn describe(scene: &HeadlessScene) -> String {
    let mut out = String::new();
    let cam = scene.camera.position;
    out.push_str(&format!(
        "=== Scene (frames={}, size={}x{}) ===\n",
        scene.frames, scene.width, scene.height
    ));
    out.push_str(&format!("Visuals: {}\n", scene.visuals.len()));
    out.push_str(&format!(
        "Camera: pos=({:.1}, {:.1}, {:.1}) yaw={:.2}\n",
        cam.x, cam.y, cam.z, scene.camera.yaw
    ));
    for (handle, v) in &scene.visuals {
        let p = v.position;
        out.push_str(&format!(
            "  [{:>4}] {:<8} pos=({:.2}, {:.2}, {:.2}) yaw={:.2} scale={:.2} opacity={:.2}\n",
            handle.0,
            v.kind.name(),
            p.x,
            p.y,
            p.z,
            v.yaw,
            v.scale,
            v.opacity
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_skip_camera() {
        let mut scene = HeadlessScene::default();
        let a = scene.add_monkey(Pose::default());
        let b = scene.add_bullet(Pose::default());
        assert_ne!(a, b);
        assert_ne!(a, CAMERA_HANDLE);
        assert_eq!(scene.visual_count(), 2);
        assert_eq!(scene.count_of(EntityKind::Monkey), 1);
    }

    #[test]
    fn building_rests_on_ground() {
        let mut scene = HeadlessScene::default();
        let h = scene.add_building(Vec3::new(10.0, -10.0, 99.0), 10.0, 8.0);
        let v = scene.visual(h).copied();
        assert_eq!(v.map(|v| v.position), Some(Vec3::new(10.0, -10.0, 4.0)));
        assert_eq!(v.map(|v| v.size), Some(Vec3::new(10.0, 10.0, 8.0)));
    }

    #[test]
    fn sink_writes_update_state() {
        let mut scene = HeadlessScene::default();
        let h = scene.add_spark(Vec3::ZERO);
        assert_eq!(scene.visual(h).map(|v| v.opacity), Some(0.75));
        scene.set_transform(h, Vec3::new(1.0, 2.0, 3.0), 0.5);
        scene.set_scale(h, 2.5);
        scene.set_opacity(h, 0.1);
        let v = scene.visual(h).copied();
        assert_eq!(
            v,
            Some(VisualState {
                kind: EntityKind::Spark,
                position: Vec3::new(1.0, 2.0, 3.0),
                yaw: 0.5,
                scale: 2.5,
                opacity: 0.1,
                size: Vec3::ZERO,
            })
        );
    }

    #[test]
    fn camera_handle_drives_camera() {
        let mut scene = HeadlessScene::default();
        let cam = scene.camera_handle();
        scene.set_transform(cam, Vec3::new(0.0, 0.0, 2.0), 1.0);
        assert_eq!(scene.camera(), Pose::new(Vec3::new(0.0, 0.0, 2.0), 1.0));
        scene.set_camera(Vec3::ONE, -1.0);
        assert_eq!(scene.camera().position, Vec3::ONE);
        assert_eq!(scene.visual_count(), 0);
    }

    #[test]
    fn removed_visual_ignores_writes() {
        let mut scene = HeadlessScene::default();
        let h = scene.add_bullet(Pose::default());
        scene.remove_visual(h);
        scene.set_transform(h, Vec3::ONE, 0.0);
        scene.remove_visual(h);
        assert!(scene.visual(h).is_none());
    }

    #[test]
    fn resize_redraws() {
        let mut scene = HeadlessScene::default();
        scene.resize(1920, 1080);
        assert_eq!(scene.size(), (1920, 1080));
        assert_eq!(scene.frames_rendered(), 1);
    }

    #[test]
    fn destroyed_scene_rejects_work() {
        let mut scene = HeadlessScene::default();
        scene.add_monkey(Pose::default());
        scene.render();
        scene.destroy();
        assert!(scene.is_destroyed());
        assert_eq!(scene.visual_count(), 0);
        scene.add_monkey(Pose::default());
        scene.render();
        scene.resize(10, 10);
        assert_eq!(scene.visual_count(), 0);
        assert_eq!(scene.frames_rendered(), 1);
        assert_eq!(scene.size(), (640, 480));
    }

    #[test]
    fn describe_lists_visuals() {
        let mut scene = HeadlessScene::default();
        scene.add_monkey(Pose::new(Vec3::new(1.0, 2.0, 3.0), 0.0));
        scene.render();
        let text = describe(&scene);
        assert!(text.contains("frames=1"));
        assert!(text.contains("Visuals: 1"));
        assert!(text.contains("monkey"));
        assert!(text.contains("pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn describe_is_one_line_per_visual() {
        let mut scene = HeadlessScene::default();
        scene.add_monkey(Pose::default());
        scene.add_bullet(Pose::default());
        let text = describe(&scene);
        assert!(text.ends_with('\n'));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("=== Scene"));
        assert!(lines[3].contains("monkey"));
        assert!(lines[4].contains("bullet"));
    }
}
