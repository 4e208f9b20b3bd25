use std::ops::ControlFlow;

use glam::Vec3;
use monkeyshot_common::{EntityId, EntityKind, Pose, SplitMix64};
use monkeyshot_input::{BACK, FIRE, FORWARD, InputState, LEFT, RIGHT};
use monkeyshot_kernel::{
    Collider, Entity, EventKind, GameEvent, PlayerInputs, render_list, test_hit_list,
    test_hit_lists, update_list,
};
use monkeyshot_render::Scene;

use crate::clock::FrameClock;
use crate::config::{ConfigError, GameConfig};
use crate::counters::Counters;
use crate::level;

/// One play session: owns every entity collection and the scene.
///
/// Entities never touch sibling collections. They report through lifecycle
/// events, which the session drains after each phase of the frame and turns
/// into spawns and score.
#[derive(Debug)]
pub struct Game<S: Scene> {
    scene: S,
    config: GameConfig,
    rng: SplitMix64,
    clock: FrameClock,
    counters: Counters,
    running: bool,
    destroyed: bool,

    player: Option<Entity>,
    monkeys: Vec<Entity>,
    buildings: Vec<Entity>,
    bullets: Vec<Entity>,
    sparks: Vec<Entity>,
    events: Vec<GameEvent>,
}

impl<S: Scene> Game<S> {
    pub fn new(scene: S, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scene,
            rng: SplitMix64::new(config.seed),
            clock: FrameClock::new(config.max_step_ms),
            config,
            counters: Counters::default(),
            running: false,
            destroyed: false,
            player: None,
            monkeys: Vec::new(),
            buildings: Vec::new(),
            bullets: Vec::new(),
            sparks: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Build the city and level 1, then start the frame clock at `now_ms`.
    pub fn run(&mut self, now_ms: f64) {
        if self.running {
            tracing::warn!("game already running");
            return;
        }
        if self.destroyed {
            tracing::warn!("game destroyed; run ignored");
            return;
        }
        self.init_world();
        self.init_level(1);
        self.running = true;
        self.clock.start(now_ms);
        tracing::info!(
            buildings = self.buildings.len(),
            monkeys = self.monkeys.len(),
            "game running"
        );
    }

    /// Host frame callback. Returns whether the host should schedule another.
    pub fn frame(&mut self, now_ms: f64, input: &InputState) -> bool {
        if !self.running {
            return false;
        }
        let _span = tracing::trace_span!("frame", now_ms).entered();
        if let Some(dt) = self.clock.advance(now_ms) {
            self.step(dt, input);
        }
        true
    }

    /// One update and render of `dt_ms`, clamped to the configured max step.
    /// Non-positive steps do nothing.
    pub fn step(&mut self, dt_ms: f64, input: &InputState) {
        if dt_ms.is_nan() || dt_ms <= 0.0 {
            return;
        }
        let dt = dt_ms.min(self.config.max_step_ms);
        self.update(dt, input);
        self.render();
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            tracing::info!(score = *self.counters.score.get(), "game stopped");
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    pub fn destroy(&mut self) {
        self.running = false;
        self.destroyed = true;
        self.scene.destroy();
    }

    /// Place a building whose base is centred on (`x`, `y`).
    pub fn add_building(&mut self, x: f32, y: f32, width: f32, height: f32) -> EntityId {
        let center = Vec3::new(x, y, height / 2.0);
        let visual = self.scene.add_building(center, width, height);
        let building = Entity::building(center, width, height).with_visual(visual);
        let id = building.id();
        self.buildings.push(building);
        id
    }

    pub fn add_monkey(&mut self, pose: Pose) -> EntityId {
        let visual = self.scene.add_monkey(pose);
        let monkey = Entity::monkey(
            pose,
            self.config.monkey_radius,
            self.config.monkey_speed,
            self.config.monkey_spin,
        )
        .with_visual(visual);
        let id = monkey.id();
        tracing::debug!(%id, x = pose.position.x, y = pose.position.y, "monkey spawned");
        self.monkeys.push(monkey);
        id
    }

    /// Place the player, replacing any current one. The camera rig is its visual.
    pub fn spawn_player(&mut self, pose: Pose) -> EntityId {
        let visual = self.scene.camera_handle();
        self.scene.set_camera(pose.position, pose.yaw);
        let player = Entity::player(pose, self.config.player).with_visual(visual);
        let id = player.id();
        tracing::debug!(%id, "player spawned");
        self.player = Some(player);
        id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// For subscribing to score, time and level.
    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub fn score(&self) -> u64 {
        *self.counters.score.get()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    pub fn monkeys(&self) -> &[Entity] {
        &self.monkeys
    }

    pub fn buildings(&self) -> &[Entity] {
        &self.buildings
    }

    pub fn bullets(&self) -> &[Entity] {
        &self.bullets
    }

    pub fn sparks(&self) -> &[Entity] {
        &self.sparks
    }

    fn init_world(&mut self) {
        for plot in level::building_grid(&self.config, &mut self.rng) {
            self.add_building(plot.x, plot.y, self.config.building_width, plot.height);
        }
    }

    fn init_level(&mut self, level: u32) {
        self.counters.level.set(level);
        for pose in level::monkey_scatter(&self.config, &mut self.rng) {
            self.add_monkey(pose);
        }
        self.spawn_player(self.config.player_start);
        tracing::info!(level, monkeys = self.monkeys.len(), "level started");
    }

    fn update(&mut self, dt_ms: f64, input: &InputState) {
        self.counters.time.update(|t| t + dt_ms);
        let dt = dt_ms as f32;

        if let Some(player) = &mut self.player {
            if let Some(p) = player.as_player_mut() {
                p.set_inputs(poll_inputs(input));
            }
            if !player.update(dt, &mut self.events) {
                tracing::debug!(id = %player.id(), "player removed");
            }
        }
        self.player.take_if(|p| !p.is_alive());
        self.dispatch_events();

        if let Some(player) = &mut self.player {
            let radius = player.collider().map_or(0.0, Collider::half_width);
            test_hit_list(player, &mut self.buildings, |p, b| {
                push_out(p, b, radius);
                ControlFlow::Break(())
            });
        }

        let scene = &mut self.scene;
        update_list(&mut self.monkeys, dt, &mut self.events, |e, _| detach(scene, e));
        update_list(&mut self.bullets, dt, &mut self.events, |e, _| detach(scene, e));
        self.dispatch_events();
        let scene = &mut self.scene;
        update_list(&mut self.sparks, dt, &mut self.events, |e, _| detach(scene, e));
        self.dispatch_events();

        let events = &mut self.events;
        test_hit_lists(&mut self.bullets, &mut self.monkeys, |bullet, monkey| {
            bullet.kill(events);
            monkey.kill(events);
            ControlFlow::Break(())
        });
        test_hit_lists(&mut self.bullets, &mut self.buildings, |bullet, _| {
            bullet.kill(events);
            ControlFlow::Break(())
        });
        self.dispatch_events();
    }

    fn render(&mut self) {
        if let Some(player) = &self.player {
            player.render(&mut self.scene);
        }
        render_list(&self.bullets, &mut self.scene);
        render_list(&self.monkeys, &mut self.scene);
        render_list(&self.sparks, &mut self.scene);
        self.scene.render();
    }

    fn dispatch_events(&mut self) {
        for event in std::mem::take(&mut self.events) {
            match (event.sender_kind, event.kind) {
                (EntityKind::Player, EventKind::Shoot { yaw }) => {
                    self.spawn_bullet(Pose::new(event.position, yaw));
                }
                (EntityKind::Monkey, EventKind::Kill) => {
                    let points = self.config.score_per_kill;
                    self.counters.score.update(|s| s + points);
                    tracing::debug!(id = %event.sender, score = self.score(), "monkey killed");
                    self.spawn_spark(event.position);
                }
                // fires for collisions and for running out of range
                (EntityKind::Bullet, EventKind::Snuff) => self.spawn_spark(event.position),
                (kind, k) => tracing::trace!(%kind, event = ?k, "unhandled event"),
            }
        }
    }

    fn spawn_bullet(&mut self, pose: Pose) {
        let visual = self.scene.add_bullet(pose);
        let bullet = Entity::bullet(
            pose,
            self.config.bullet_speed,
            self.config.bullet_duration_ms,
            self.config.bullet_radius,
        )
        .with_visual(visual);
        tracing::debug!(id = %bullet.id(), "bullet fired");
        self.bullets.push(bullet);
    }

    fn spawn_spark(&mut self, position: Vec3) {
        let visual = self.scene.add_spark(position);
        let spark = Entity::spark(position, self.config.spark_duration_ms).with_visual(visual);
        self.sparks.push(spark);
    }
}

fn poll_inputs(input: &InputState) -> PlayerInputs {
    PlayerInputs {
        forward: input.pressed(FORWARD),
        back: input.pressed(BACK),
        left: input.pressed(LEFT),
        right: input.pressed(RIGHT),
        fire: input.pressed(FIRE),
    }
}

fn detach<S: Scene>(scene: &mut S, entity: &Entity) {
    if let Some(visual) = entity.visual() {
        scene.remove_visual(visual);
    }
    tracing::debug!(id = %entity.id(), kind = %entity.kind(), "removed");
}

/// Move the player out of a building along the axis it is further off-centre on.
fn push_out(player: &mut Entity, building: &Entity, player_radius: f32) {
    let min_dist = building.collider().map_or(0.0, Collider::half_width) + player_radius;
    let bp = building.position();
    let pp = &mut player.object_mut().position;
    let dx = (pp.x - bp.x).abs();
    let dy = (pp.y - bp.y).abs();
    if dx > dy {
        pp.x = if pp.x < bp.x { bp.x - min_dist } else { bp.x + min_dist };
    } else {
        pp.y = if pp.y < bp.y { bp.y - min_dist } else { bp.y + min_dist };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkeyshot_render::HeadlessScene;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_config() -> GameConfig {
        GameConfig {
            grid_size: 0,
            monkey_count: 0,
            ..GameConfig::default()
        }
    }

    fn scripted() -> Game<HeadlessScene> {
        Game::new(HeadlessScene::default(), empty_config()).unwrap()
    }

    fn firing() -> InputState {
        let mut input = InputState::with_default_bindings();
        input.press(FIRE).unwrap();
        input
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            bullet_duration_ms: 0.0,
            ..GameConfig::default()
        };
        assert!(Game::new(HeadlessScene::default(), config).is_err());
    }

    #[test]
    fn run_builds_city_and_level() {
        let mut game = Game::new(HeadlessScene::default(), GameConfig::default()).unwrap();
        game.run(0.0);
        assert!(game.is_running());
        assert_eq!(game.buildings().len(), 100);
        assert_eq!(game.monkeys().len(), 20);
        assert!(game.player().is_some());
        assert_eq!(*game.counters().level.get(), 1);
        assert_eq!(game.scene().count_of(EntityKind::Building), 100);
        assert_eq!(game.scene().count_of(EntityKind::Monkey), 20);

        // second run is ignored
        game.run(10.0);
        assert_eq!(game.buildings().len(), 100);
    }

    #[test]
    fn bullet_kills_monkey_in_its_path() {
        let mut game = scripted();
        game.spawn_player(Pose::new(Vec3::new(0.0, 0.0, 2.0), 0.0));
        let monkey_pos = Vec3::new(6.0, 0.0, 1.5);
        game.add_monkey(Pose::new(monkey_pos, 0.0));

        // frame 1 fires; the bullet starts at x=0 and moves 30 u/s
        game.step(100.0, &firing());
        assert_eq!(game.bullets().len(), 1);
        let idle = InputState::with_default_bindings();
        for _ in 0..2 {
            game.step(100.0, &idle);
        }

        assert!(game.monkeys().is_empty());
        assert!(game.bullets().is_empty());
        assert_eq!(game.score(), 100);
        let spark_at_monkey = game
            .sparks()
            .iter()
            .any(|s| s.position() == monkey_pos);
        assert!(spark_at_monkey);
        // one spark for the monkey, one for the bullet
        assert_eq!(game.sparks().len(), 2);
        assert_eq!(game.scene().count_of(EntityKind::Monkey), 0);
        assert_eq!(game.scene().count_of(EntityKind::Bullet), 0);
    }

    #[test]
    fn killed_monkey_stays_listed_until_next_frame() {
        let mut game = scripted();
        game.spawn_player(Pose::new(Vec3::new(0.0, 0.0, 2.0), 0.0));
        game.add_monkey(Pose::new(Vec3::new(0.5, 0.0, 1.5), 0.0));
        game.step(16.0, &firing());
        assert_eq!(game.score(), 100);
        assert_eq!(game.monkeys().len(), 1);
        assert!(!game.monkeys()[0].is_alive());
        game.step(16.0, &InputState::new());
        assert!(game.monkeys().is_empty());
    }

    #[test]
    fn player_pushed_out_of_building() {
        let mut game = scripted();
        game.add_building(0.0, 0.0, 10.0, 12.0);
        game.spawn_player(Pose::new(Vec3::new(3.0, 1.0, 2.0), 0.0));
        game.step(16.0, &InputState::new());
        let p = game.player().map(Entity::position);
        assert_eq!(p, Some(Vec3::new(6.5, 1.0, 2.0)));
    }

    #[test]
    fn player_pushed_out_along_y() {
        let mut game = scripted();
        game.add_building(0.0, 0.0, 10.0, 12.0);
        game.spawn_player(Pose::new(Vec3::new(-1.0, -4.0, 2.0), 0.0));
        game.step(16.0, &InputState::new());
        let p = game.player().map(Entity::position);
        assert_eq!(p, Some(Vec3::new(-1.0, -6.5, 2.0)));
    }

    #[test]
    fn bullet_stops_at_building() {
        let mut game = scripted();
        game.add_building(10.0, 0.0, 10.0, 12.0);
        game.spawn_player(Pose::new(Vec3::new(0.0, 0.0, 2.0), 0.0));
        game.step(16.0, &firing());
        let idle = InputState::new();
        for _ in 0..4 {
            game.step(100.0, &idle);
        }
        assert!(game.bullets().is_empty());
        assert_eq!(game.score(), 0);
        assert_eq!(game.sparks().len(), 1);
    }

    #[test]
    fn expired_bullet_leaves_a_spark() {
        let mut game = scripted();
        game.spawn_player(Pose::default());
        game.step(16.0, &firing());
        let idle = InputState::new();
        for _ in 0..20 {
            game.step(100.0, &idle);
        }
        assert!(game.bullets().is_empty());
        assert!(game.sparks().len() <= 1);
        assert_eq!(game.score(), 0);
        // the spark fades out too
        for _ in 0..10 {
            game.step(100.0, &idle);
        }
        assert!(game.sparks().is_empty());
        assert_eq!(game.scene().visual_count(), 0);
    }

    #[test]
    fn held_fire_is_rate_limited() {
        let mut game = scripted();
        game.spawn_player(Pose::default());
        let input = firing();
        for _ in 0..10 {
            game.step(100.0, &input);
        }
        // shots at 0, 400 and 800 ms
        assert_eq!(game.bullets().len(), 3);
    }

    #[test]
    fn player_drives_camera() {
        let mut game = scripted();
        game.spawn_player(Pose::new(Vec3::new(0.0, 0.0, 2.0), 0.0));
        let mut input = InputState::with_default_bindings();
        input.press(FORWARD).unwrap();
        game.step(100.0, &input);
        let cam = game.scene().camera();
        assert!((cam.position.x - 0.8).abs() < 1e-5);
        assert_eq!(game.scene().frames_rendered(), 1);
    }

    #[test]
    fn step_clamps_and_counts_time() {
        let mut game = scripted();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        game.counters_mut()
            .time
            .subscribe(move |t| sink.borrow_mut().push(*t));
        game.step(5000.0, &InputState::new());
        game.step(-3.0, &InputState::new());
        game.step(16.0, &InputState::new());
        assert_eq!(*game.counters().time.get(), 116.0);
        assert_eq!(*seen.borrow(), vec![100.0, 116.0]);
    }

    #[test]
    fn frame_follows_clock_and_stop() {
        let mut game = scripted();
        let input = InputState::new();
        assert!(!game.frame(0.0, &input));
        game.run(1000.0);
        assert!(game.frame(1016.0, &input));
        assert!(game.frame(1016.0, &input));
        assert_eq!(*game.counters().time.get(), 16.0);
        assert_eq!(game.scene().frames_rendered(), 1);
        game.stop();
        assert!(!game.frame(1032.0, &input));
        assert_eq!(*game.counters().time.get(), 16.0);
    }

    #[test]
    fn long_session_keeps_no_input_backlog() {
        let mut game = scripted();
        game.run(0.0);
        let mut input = InputState::with_default_bindings();
        for i in 1..=10_000u32 {
            input.key_down(32);
            game.frame(f64::from(i) * 16.0, &input);
            input.key_up(32);
        }
        assert_eq!(input.pending_transitions(), 0);
        assert!(game.bullets().len() < 10);
    }

    #[test]
    fn destroy_shuts_everything_down() {
        let mut game = scripted();
        game.run(0.0);
        game.resize(800, 600);
        assert_eq!(game.scene().size(), (800, 600));
        game.destroy();
        assert!(!game.is_running());
        assert!(game.scene().is_destroyed());
        game.run(10.0);
        assert!(!game.is_running());
    }
}
