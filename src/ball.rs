// ball.rs
// The Ball entity (one per task) and its creation helpers

use crate::config;
use once_cell::sync::Lazy;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use ultraviolet::Vec2;

/// Palette cycled through when a ball is created without an assigned color.
pub static BALL_COLORS: Lazy<[Srgb<u8>; 6]> = Lazy::new(|| {
    [
        Srgb::new(0xFF, 0x6B, 0x6B),
        Srgb::new(0x4E, 0xCD, 0xC4),
        Srgb::new(0x45, 0xB7, 0xD1),
        Srgb::new(0xFF, 0xA0, 0x7A),
        Srgb::new(0x98, 0xD8, 0xC8),
        Srgb::new(0xF7, 0xDC, 0x6F),
    ]
});

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Id for a driver-created ball. External records carry their own ids.
pub fn next_ball_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub text: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ball {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Derived once from density at creation; constant for the ball's lifetime.
    pub radius: f32,
    /// Normalized [DENSITY_MIN, DENSITY_MAX]; maps to the vertical resting line.
    pub density: f32,
    /// [0, 101]; values above PROGRESS_MAX mark the ball for removal.
    pub progress: u8,
    pub title: String,
    pub color: [u8; 3],
    pub milestones: SmallVec<[Milestone; 4]>,
}

pub fn radius_for_density(density: f32) -> f32 {
    config::BASE_BALL_RADIUS
        * (config::RADIUS_MIN_MULTIPLIER + density * config::RADIUS_RANGE_MULTIPLIER)
}

pub fn random_density() -> f32 {
    config::DENSITY_MIN + fastrand::f32() * (config::DENSITY_MAX - config::DENSITY_MIN)
}

pub fn random_color() -> [u8; 3] {
    let c = BALL_COLORS[fastrand::usize(..BALL_COLORS.len())];
    [c.red, c.green, c.blue]
}

/// Initial per-frame displacement: small random horizontal drift, no vertical.
pub fn initial_velocity() -> Vec2 {
    Vec2::new(
        (fastrand::f32() - 0.5) * 2.0 * config::INITIAL_MAX_HSPEED,
        0.0,
    )
}

impl Ball {
    pub fn new(title: impl Into<String>, x: f32) -> Self {
        Self::with_id(next_ball_id(), title, x)
    }

    pub fn with_id(id: u64, title: impl Into<String>, x: f32) -> Self {
        let density = random_density();
        Self {
            id,
            pos: Vec2::new(x, config::INITIAL_BALL_Y),
            vel: initial_velocity(),
            radius: radius_for_density(density),
            density,
            progress: 0,
            title: title.into(),
            color: random_color(),
            milestones: SmallVec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.progress > config::PROGRESS_MAX
    }

    /// (completed, total) milestone counts for the render snapshot.
    pub fn milestone_counts(&self) -> (usize, usize) {
        let done = self.milestones.iter().filter(|m| m.completed).count();
        (done, self.milestones.len())
    }

    /// Progress derived from milestone completion; 0 when there are none.
    pub fn progress_from_milestones(&self) -> u8 {
        let (done, total) = self.milestone_counts();
        if total == 0 {
            return 0;
        }
        (done as f32 / total as f32 * config::PROGRESS_MAX as f32).round() as u8
    }

    /// Vertical resting line for this ball's density, clamped into the
    /// floating band between the boundary lines.
    pub fn resting_y(&self, viewport_height: f32) -> f32 {
        let lo = config::HEADER_HEIGHT + config::FLOAT_TOP_OFFSET;
        let hi = viewport_height - config::FOOTER_HEIGHT - config::FLOAT_BOTTOM_OFFSET;
        (viewport_height * self.density).max(lo).min(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_scales_with_density_inside_band() {
        let lo = radius_for_density(config::DENSITY_MIN);
        let hi = radius_for_density(config::DENSITY_MAX);
        assert!(lo < hi);
        assert!((lo - 39.5).abs() < 1e-4);
        assert!((hi - 59.0).abs() < 1e-4);
    }

    #[test]
    fn new_ball_has_fixed_height_and_bounded_drift() {
        for _ in 0..50 {
            let ball = Ball::new("t", 300.0);
            assert_eq!(ball.pos.y, config::INITIAL_BALL_Y);
            assert_eq!(ball.vel.y, 0.0);
            assert!(ball.vel.x.abs() <= config::INITIAL_MAX_HSPEED);
            assert!(ball.density >= config::DENSITY_MIN && ball.density <= config::DENSITY_MAX);
            assert!(ball.radius > 0.0);
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = Ball::new("a", 0.0);
        let b = Ball::new("b", 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn milestone_progress_rounds() {
        let mut ball = Ball::new("t", 0.0);
        assert_eq!(ball.progress_from_milestones(), 0);
        ball.milestones.push(Milestone { text: "a".into(), completed: true });
        ball.milestones.push(Milestone { text: "b".into(), completed: true });
        ball.milestones.push(Milestone { text: "c".into(), completed: false });
        assert_eq!(ball.progress_from_milestones(), 67);
        assert_eq!(ball.milestone_counts(), (2, 3));
    }

    #[test]
    fn resting_line_is_linear_in_density_and_clamped() {
        let mut ball = Ball::new("t", 0.0);
        ball.density = 0.5;
        assert_eq!(ball.resting_y(1000.0), 500.0);
        ball.density = config::DENSITY_MIN;
        // 0.15 * 1000 = 150 sits below the top of the floating band.
        assert_eq!(ball.resting_y(1000.0), config::HEADER_HEIGHT + config::FLOAT_TOP_OFFSET);
        ball.density = config::DENSITY_MAX;
        assert_eq!(ball.resting_y(1000.0), 800.0);
    }

    #[test]
    fn completion_sentinel_marks_ball() {
        let mut ball = Ball::new("t", 0.0);
        ball.progress = config::PROGRESS_MAX;
        assert!(!ball.is_completed());
        ball.progress = config::PROGRESS_COMPLETE;
        assert!(ball.is_completed());
    }
}
