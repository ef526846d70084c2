// simulation/simulation.rs
// The Simulation state object and per-frame step

use super::{collision, integrate};
use crate::ball::Ball;
use crate::config::{self, SimConfig};
use crate::profile_scope;
use crate::spatial_grid::SpatialGrid;
use ultraviolet::Vec2;

/// Viewport dimensions, read from the host each frame via SetViewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero or non-finite viewport means the frame is skipped entirely.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Externally-anchored position of the ball currently being dragged.
#[derive(Clone, Copy, Debug)]
pub struct DragAnchor {
    pub id: u64,
    pub pos: Vec2,
}

/// The full simulation state for one frame loop. Owned by the driver and
/// passed by reference into the integrator and collision resolver.
pub struct Simulation {
    pub frame: u64,
    pub balls: Vec<Ball>,
    pub grid: SpatialGrid,
    pub viewport: Viewport,
    pub dragged: Option<DragAnchor>,
    pub config: SimConfig,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            frame: 0,
            balls: Vec::new(),
            grid: SpatialGrid::new(config.cell_size),
            viewport: Viewport::default(),
            dragged: None,
            config,
        }
    }

    /// Advance one frame: integrate, rebuild the grid, resolve collisions,
    /// filter completed balls, reassert the dragged anchor. Returns the ids
    /// removed by the completion filter.
    ///
    /// Removal is deferred to this end-of-frame filter, so a ball whose
    /// progress crossed the sentinel still exerts one final frame of effect.
    pub fn step(&mut self) -> Vec<u64> {
        profile_scope!("step");
        if !self.viewport.is_valid() {
            return Vec::new();
        }
        integrate::integrate(self);
        collision::collide(self);
        let removed = self.filter_completed();
        self.reassert_dragged();
        self.frame += 1;
        removed
    }

    pub fn ball(&self, id: u64) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: u64) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Random spawn x inside the creation band of the current viewport.
    pub fn spawn_x(&self) -> f32 {
        let width = if self.viewport.is_valid() {
            self.viewport.width
        } else {
            config::FALLBACK_VIEWPORT_WIDTH
        };
        let span = (width - config::CREATION_PADDING).max(0.0);
        fastrand::f32() * span + config::CREATION_OFFSET
    }

    fn filter_completed(&mut self) -> Vec<u64> {
        profile_scope!("filter_completed");
        let mut removed = Vec::new();
        self.balls.retain(|ball| {
            if ball.is_completed() {
                removed.push(ball.id);
                false
            } else {
                true
            }
        });
        if let Some(anchor) = self.dragged {
            if removed.contains(&anchor.id) {
                self.dragged = None;
            }
        }
        removed
    }

    /// The dragged ball's position is externally controlled; whatever the
    /// collision pass did to it this frame is overwritten here.
    fn reassert_dragged(&mut self) {
        if let Some(anchor) = self.dragged {
            if let Some(ball) = self.ball_mut(anchor.id) {
                ball.pos = anchor.pos;
                ball.vel = Vec2::zero();
            }
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
