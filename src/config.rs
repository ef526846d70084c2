// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

// ====================
// Physics Parameters
// ====================
/// Spring constant pulling a ball toward its density-derived resting line.
pub const RESTORE_FORCE: f32 = 0.01;
/// Per-frame isotropic velocity damping.
pub const AIR_RESISTANCE: f32 = 0.98;
/// Velocity scale applied on boundary reflection.
pub const BOUNCE_DAMPING: f32 = 0.8;
/// Impulse scale applied on ball-ball collision response.
pub const COLLISION_DAMPING: f32 = 0.8;
/// Extra horizontal damping applied on a bottom-boundary bounce.
pub const BOTTOM_FRICTION: f32 = 0.95;

// ====================
// Viewport Bounds
// ====================
/// Top boundary line, pixels from the viewport top.
pub const HEADER_HEIGHT: f32 = 72.0;
/// Bottom boundary line, pixels from the viewport bottom.
pub const FOOTER_HEIGHT: f32 = 64.0;
/// Left boundary as a fraction of viewport width.
pub const LEFT_BOUND_FRACTION: f32 = 0.1;
/// Right boundary as a fraction of viewport width.
pub const RIGHT_BOUND_FRACTION: f32 = 0.9;
/// Resting lines are clamped this far below the top boundary.
pub const FLOAT_TOP_OFFSET: f32 = 80.0;
/// Resting lines are clamped this far above the bottom boundary.
pub const FLOAT_BOTTOM_OFFSET: f32 = 80.0;

// ====================
// Ball Parameters
// ====================
pub const BASE_BALL_RADIUS: f32 = 50.0;
/// Fixed spawn height for new balls.
pub const INITIAL_BALL_Y: f32 = 50.0;
/// New balls start with |vx| at most this value and vy = 0.
pub const INITIAL_MAX_HSPEED: f32 = 1.0;
/// Density band; also the normalized depth range of the resting lines.
pub const DENSITY_MIN: f32 = 0.15;
pub const DENSITY_MAX: f32 = 0.8;
/// Radius = BASE_BALL_RADIUS * (RADIUS_MIN_MULTIPLIER + density * RADIUS_RANGE_MULTIPLIER).
pub const RADIUS_MIN_MULTIPLIER: f32 = 0.7;
pub const RADIUS_RANGE_MULTIPLIER: f32 = 0.6;

// ====================
// Progress
// ====================
pub const PROGRESS_MAX: u8 = 100;
/// Sentinel one past the maximum; marks a ball for removal at the next filter pass.
pub const PROGRESS_COMPLETE: u8 = 101;

// ====================
// Spatial Grid
// ====================
/// Must exceed the largest possible ball diameter (118) so every colliding
/// pair falls inside a 3x3 cell neighborhood.
pub const GRID_CELL_SIZE: f32 = 150.0;

// ====================
// Ripple
// ====================
pub const RIPPLE_RADIUS: f32 = 300.0;
pub const RIPPLE_FORCE_DIVISOR: f32 = 30.0;

// ====================
// Interaction
// ====================
/// A press/release pair within both thresholds classifies as a click.
pub const CLICK_MAX_DISTANCE: f32 = 5.0;
pub const CLICK_MAX_MS: u64 = 300;

// ====================
// Driver
// ====================
pub const FRAME_RATE_HZ: u32 = 60;
/// Physics runs every frame; snapshots publish every Nth frame.
pub const RENDER_FRAME_SKIP: u64 = 2;
/// New tasks spawn at x in [CREATION_OFFSET, width - CREATION_PADDING + CREATION_OFFSET).
pub const CREATION_PADDING: f32 = 200.0;
pub const CREATION_OFFSET: f32 = 100.0;
/// Fallback width used for spawn placement before a viewport is known.
pub const FALLBACK_VIEWPORT_WIDTH: f32 = 800.0;

/// Runtime-tunable simulation parameters. Defaults mirror the constants
/// above; a TOML file may override any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub restore_force: f32,
    pub air_resistance: f32,
    pub bounce_damping: f32,
    pub collision_damping: f32,
    pub bottom_friction: f32,
    pub ripple_radius: f32,
    pub ripple_force_divisor: f32,
    pub cell_size: f32,
    pub click_max_distance: f32,
    pub click_max_ms: u64,
    pub frame_rate_hz: u32,
    pub frame_skip: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            restore_force: RESTORE_FORCE,
            air_resistance: AIR_RESISTANCE,
            bounce_damping: BOUNCE_DAMPING,
            collision_damping: COLLISION_DAMPING,
            bottom_friction: BOTTOM_FRICTION,
            ripple_radius: RIPPLE_RADIUS,
            ripple_force_divisor: RIPPLE_FORCE_DIVISOR,
            cell_size: GRID_CELL_SIZE,
            click_max_distance: CLICK_MAX_DISTANCE,
            click_max_ms: CLICK_MAX_MS,
            frame_rate_hz: FRAME_RATE_HZ,
            frame_skip: RENDER_FRAME_SKIP,
        }
    }
}

impl SimConfig {
    /// Load overrides from a TOML file. Missing fields fall back to defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.restore_force, RESTORE_FORCE);
        assert_eq!(cfg.air_resistance, AIR_RESISTANCE);
        assert_eq!(cfg.cell_size, GRID_CELL_SIZE);
        assert_eq!(cfg.frame_skip, RENDER_FRAME_SKIP);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: SimConfig = toml::from_str("restore_force = 0.02\nframe_skip = 4").unwrap();
        assert_eq!(cfg.restore_force, 0.02);
        assert_eq!(cfg.frame_skip, 4);
        assert_eq!(cfg.air_resistance, AIR_RESISTANCE);
        assert_eq!(cfg.bounce_damping, BOUNCE_DAMPING);
    }

    #[test]
    fn cell_size_exceeds_max_ball_diameter() {
        let max_radius = BASE_BALL_RADIUS * (RADIUS_MIN_MULTIPLIER + DENSITY_MAX * RADIUS_RANGE_MULTIPLIER);
        assert!(GRID_CELL_SIZE > 2.0 * max_radius);
    }
}
