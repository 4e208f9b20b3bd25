use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::Vec3;
use monkeyshot_common::Pose;
use monkeyshot_kernel::PlayerTuning;
use serde::{Deserialize, Serialize};

/// Largest city a config may ask for, in buildings per side.
pub const MAX_GRID_SIZE: u32 = 256;
pub const MAX_MONKEYS: u32 = 10_000;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable of a session. Missing YAML keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Buildings per side of the square city grid.
    pub grid_size: u32,
    pub building_width: f32,
    pub building_min_height: f32,
    pub building_max_height: f32,

    pub monkey_count: u32,
    pub monkey_radius: f32,
    /// Units per second along the spawn heading.
    pub monkey_speed: f32,
    /// Radians per second.
    pub monkey_spin: f32,
    pub monkey_height: f32,

    pub player_start: Pose,
    pub player: PlayerTuning,

    pub bullet_speed: f32,
    pub bullet_duration_ms: f32,
    pub bullet_radius: f32,

    pub spark_duration_ms: f32,
    pub score_per_kill: u64,

    /// Longest step a single frame may simulate.
    pub max_step_ms: f64,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            building_width: 10.0,
            building_min_height: 6.0,
            building_max_height: 20.0,
            monkey_count: 20,
            monkey_radius: 1.0,
            monkey_speed: 0.0,
            monkey_spin: 1.0,
            monkey_height: 2.0,
            player_start: Pose::new(Vec3::new(0.0, 0.0, 2.0), -FRAC_PI_2),
            player: PlayerTuning::default(),
            bullet_speed: 30.0,
            bullet_duration_ms: 2000.0,
            bullet_radius: 0.5,
            spark_duration_ms: 500.0,
            score_per_kill: 100,
            max_step_ms: 100.0,
            seed: 1,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size > MAX_GRID_SIZE {
            return Err(invalid(format!(
                "grid_size must be at most {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if self.monkey_count > MAX_MONKEYS {
            return Err(invalid(format!(
                "monkey_count must be at most {MAX_MONKEYS}, got {}",
                self.monkey_count
            )));
        }
        let positive = [
            ("building_width", self.building_width),
            ("bullet_duration_ms", self.bullet_duration_ms),
            ("spark_duration_ms", self.spark_duration_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("building_min_height", self.building_min_height),
            ("monkey_radius", self.monkey_radius),
            ("bullet_radius", self.bullet_radius),
            ("player.radius", self.player.radius),
            ("player.fire_cooldown_ms", self.player.fire_cooldown_ms),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        let finite = [
            ("monkey_speed", self.monkey_speed),
            ("monkey_spin", self.monkey_spin),
            ("monkey_height", self.monkey_height),
            ("bullet_speed", self.bullet_speed),
            ("player.forward_speed", self.player.forward_speed),
            ("player.rotation_speed", self.player.rotation_speed),
            ("player.muzzle_drop", self.player.muzzle_drop),
            ("player_start.yaw", self.player_start.yaw),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }
        if !self.player_start.position.is_finite() {
            return Err(invalid("player_start.position must be finite".into()));
        }
        if !(self.building_max_height.is_finite()
            && self.building_max_height >= self.building_min_height)
        {
            return Err(invalid(format!(
                "building_max_height {} is below building_min_height {}",
                self.building_max_height, self.building_min_height
            )));
        }
        if !(self.max_step_ms.is_finite() && self.max_step_ms > 0.0) {
            return Err(invalid(format!(
                "max_step_ms must be positive, got {}",
                self.max_step_ms
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
