use glam::Vec3;
use monkeyshot_common::{heading, wrap_angle};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::event::{EventKind, EventSink};
use crate::object::GameObject;

/// Boolean controls read once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInputs {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Movement and weapon constants for the player avatar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    /// Units per second; reversing moves at half this.
    pub forward_speed: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    pub fire_cooldown_ms: f32,
    /// How far below the body centre bullets leave from.
    pub muzzle_drop: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 1.5,
            forward_speed: 8.0,
            rotation_speed: FRAC_PI_2,
            fire_cooldown_ms: 333.0,
            muzzle_drop: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub inputs: PlayerInputs,
    fire_cooldown: f32,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            inputs: PlayerInputs::default(),
            fire_cooldown: 0.0,
            tuning,
        }
    }

    pub fn set_inputs(&mut self, inputs: PlayerInputs) {
        self.inputs = inputs;
    }

    /// Milliseconds until the next shot is allowed.
    pub fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }

    pub(crate) fn update(
        &mut self,
        object: &mut GameObject,
        dt_ms: f32,
        sink: &mut impl EventSink,
    ) -> bool {
        if !object.advance(dt_ms, sink) {
            return false;
        }
        self.fire_cooldown = (self.fire_cooldown - dt_ms).max(0.0);

        let ft = dt_ms / 1000.0;
        let i = self.inputs;
        let speed = if i.forward {
            self.tuning.forward_speed
        } else if i.back {
            -0.5 * self.tuning.forward_speed
        } else {
            0.0
        };
        let turn = if i.left {
            self.tuning.rotation_speed
        } else if i.right {
            -self.tuning.rotation_speed
        } else {
            0.0
        };

        // turn first, then move along the new heading
        object.yaw = wrap_angle(object.yaw + turn * ft);
        let step = heading(object.yaw) * (speed * ft);
        object.position.x += step.x;
        object.position.y += step.y;

        if i.fire && self.fire_cooldown <= 0.0 {
            let mut shot = object.event(EventKind::Shoot { yaw: object.yaw });
            shot.position = object.position - Vec3::Z * self.tuning.muzzle_drop;
            sink.emit(shot);
            self.fire_cooldown = self.tuning.fire_cooldown_ms;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::event::GameEvent;
    use monkeyshot_common::Pose;
    use std::f32::consts::PI;

    fn player_at_origin() -> Entity {
        Entity::player(Pose::new(Vec3::new(0.0, 0.0, 2.0), 0.0), PlayerTuning::default())
    }

    fn drive(e: &mut Entity, inputs: PlayerInputs, frames: usize, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if let Some(p) = e.as_player_mut() {
            p.set_inputs(inputs);
        }
        for _ in 0..frames {
            e.update(dt, &mut events);
        }
        events
    }

    #[test]
    fn forward_moves_along_heading() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            forward: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 10, 100.0);
        assert!((e.position().x - 8.0).abs() < 1e-3);
        assert!(e.position().y.abs() < 1e-3);
        assert_eq!(e.position().z, 2.0);
    }

    #[test]
    fn back_moves_at_half_speed() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            back: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 1, 1000.0);
        assert!((e.position().x + 4.0).abs() < 1e-4);
    }

    #[test]
    fn forward_wins_over_back() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            forward: true,
            back: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 1, 1000.0);
        assert!((e.position().x - 8.0).abs() < 1e-4);
    }

    #[test]
    fn left_turns_counter_clockwise() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            left: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 1, 1000.0);
        assert!((e.yaw() - PI / 2.0).abs() < 1e-5);
        // turning in place does not translate
        assert_eq!(e.position(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn turn_applies_before_translation() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            forward: true,
            right: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 1, 1000.0);
        // heading after the turn is -pi/2 (kept as 3pi/2), so the step goes down y
        assert!((e.yaw() - 1.5 * PI).abs() < 1e-5);
        assert!(e.position().x.abs() < 1e-4);
        assert!((e.position().y + 8.0).abs() < 1e-4);
    }

    #[test]
    fn yaw_stays_within_one_turn() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            left: true,
            ..Default::default()
        };
        drive(&mut e, inputs, 50, 1000.0);
        assert!((0.0..std::f32::consts::TAU).contains(&e.yaw()));
    }

    #[test]
    fn fire_emits_shoot_from_muzzle() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            fire: true,
            ..Default::default()
        };
        let events = drive(&mut e, inputs, 1, 16.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Shoot { yaw: 0.0 });
        assert_eq!(events[0].position, Vec3::new(0.0, 0.0, 1.5));
        assert_eq!(e.as_player().map(|p| p.fire_cooldown()), Some(333.0));
    }

    #[test]
    fn held_fire_respects_cooldown() {
        let mut e = player_at_origin();
        let inputs = PlayerInputs {
            fire: true,
            ..Default::default()
        };
        // frames 1, 35 and 69 fire within one second at 10ms steps
        let events = drive(&mut e, inputs, 100, 10.0);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn dead_player_stays_put() {
        let mut e = player_at_origin();
        let mut sink: Vec<GameEvent> = Vec::new();
        e.kill(&mut sink);
        let inputs = PlayerInputs {
            forward: true,
            fire: true,
            ..Default::default()
        };
        let events = drive(&mut e, inputs, 5, 100.0);
        assert!(events.is_empty());
        assert_eq!(e.position(), Vec3::new(0.0, 0.0, 2.0));
    }
}
