//! Procedural level layout.

use std::f32::consts::TAU;

use glam::Vec3;
use monkeyshot_common::{Pose, SplitMix64};

use crate::config::GameConfig;

/// Where one building goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingPlot {
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

/// Centre-to-centre distance between grid cells; streets are as wide as blocks.
pub fn grid_spacing(config: &GameConfig) -> f32 {
    config.building_width * 2.0
}

/// A square grid of buildings, rows along +Y, with random heights.
pub fn building_grid(config: &GameConfig, rng: &mut SplitMix64) -> Vec<BuildingPlot> {
    let n = config.grid_size;
    let half = n as f32 / 2.0;
    let spacing = grid_spacing(config);
    let mut plots = Vec::with_capacity(n as usize * n as usize);
    for iy in 0..n {
        for ix in 0..n {
            let height = rng.range_f32(config.building_min_height, config.building_max_height);
            plots.push(BuildingPlot {
                x: (ix as f32 - half) * spacing + config.building_width,
                y: (iy as f32 - half) * spacing + config.building_width,
                height,
            });
        }
    }
    plots
}

/// Monkey spawn poses on street intersections, each facing a random way.
pub fn monkey_scatter(config: &GameConfig, rng: &mut SplitMix64) -> Vec<Pose> {
    let n = config.grid_size as f32;
    let spacing = grid_spacing(config);
    let offset = n * spacing / 2.0;
    (0..config.monkey_count)
        .map(|_| {
            let x = (rng.next_f32() * n).round() * spacing - offset;
            let y = (rng.next_f32() * n).round() * spacing - offset;
            let yaw = rng.next_f32() * TAU;
            Pose::new(Vec3::new(x, y, config.monkey_height), yaw)
        })
        .collect()
}
