// app/input.rs
// Pointer state machine: drag anchoring and click-vs-drag classification

use crate::config::SimConfig;
use crate::simulation::{DragAnchor, Simulation};
use std::time::{Duration, Instant};
use ultraviolet::Vec2;

struct PressInfo {
    id: u64,
    pos: Vec2,
    at: Instant,
}

/// Tracks one pointer across a press/move/release gesture. While a ball is
/// held, its anchor lives in `Simulation::dragged` and the step loop
/// reasserts it; this tracker only decides, on release, whether the gesture
/// was a click.
pub struct PointerTracker {
    press: Option<PressInfo>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self { press: None }
    }

    /// Primary-button press directly over a ball begins a drag.
    pub fn pointer_down(&mut self, sim: &mut Simulation, id: u64, point: Vec2) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        let Some(ball) = sim.ball(id) else { return };
        self.press = Some(PressInfo {
            id,
            pos: point,
            at: Instant::now(),
        });
        sim.dragged = Some(DragAnchor { id, pos: ball.pos });
    }

    /// Move the held ball to the pointer. Position is driven externally and
    /// velocity forced to zero so release imparts no residual motion.
    pub fn pointer_move(&mut self, sim: &mut Simulation, point: Vec2) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        if let Some(mut anchor) = sim.dragged {
            anchor.pos = point;
            sim.dragged = Some(anchor);
            if let Some(ball) = sim.ball_mut(anchor.id) {
                ball.pos = point;
                ball.vel = Vec2::zero();
            }
        }
    }

    /// End the gesture. Returns the ball id when it classifies as a click
    /// (selection); a completed drag has no selection side effect. A ball
    /// removed mid-gesture (completion filter, deletion) yields no selection.
    pub fn pointer_up(&mut self, sim: &mut Simulation, point: Vec2) -> Option<u64> {
        sim.dragged = None;
        let press = self.press.take()?;
        if sim.ball(press.id).is_none() {
            return None;
        }
        let moved = (point - press.pos).mag();
        if is_click(moved, press.at.elapsed(), &sim.config) {
            Some(press.id)
        } else {
            None
        }
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn is_click(distance: f32, held_for: Duration, config: &SimConfig) -> bool {
    distance < config.click_max_distance && held_for < Duration::from_millis(config.click_max_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Viewport;

    fn sim_with_ball() -> (Simulation, u64) {
        let mut sim = Simulation::new();
        sim.viewport = Viewport::new(1000.0, 800.0);
        let ball = crate::ball::Ball::new("t", 300.0);
        let id = ball.id;
        sim.balls.push(ball);
        sim.balls[0].pos = Vec2::new(300.0, 400.0);
        (sim, id)
    }

    #[test]
    fn drag_holds_position_and_zero_velocity_through_steps() {
        let (mut sim, id) = sim_with_ball();
        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, id, Vec2::new(300.0, 400.0));
        tracker.pointer_move(&mut sim, Vec2::new(500.0, 350.0));

        for _ in 0..5 {
            sim.step();
            let ball = sim.ball(id).unwrap();
            assert_eq!(ball.pos, Vec2::new(500.0, 350.0));
            assert_eq!(ball.vel, Vec2::zero());
        }
    }

    #[test]
    fn release_after_long_drag_is_not_a_click() {
        let (mut sim, id) = sim_with_ball();
        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, id, Vec2::new(300.0, 400.0));
        tracker.pointer_move(&mut sim, Vec2::new(500.0, 350.0));
        let selected = tracker.pointer_up(&mut sim, Vec2::new(500.0, 350.0));
        assert_eq!(selected, None, "moved past the click distance threshold");
        assert!(sim.dragged.is_none());
    }

    #[test]
    fn quick_stationary_release_is_a_click() {
        let (mut sim, id) = sim_with_ball();
        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, id, Vec2::new(300.0, 400.0));
        let selected = tracker.pointer_up(&mut sim, Vec2::new(302.0, 401.0));
        assert_eq!(selected, Some(id));
    }

    #[test]
    fn classification_thresholds() {
        let config = SimConfig::default();
        assert!(is_click(0.0, Duration::from_millis(0), &config));
        assert!(is_click(4.9, Duration::from_millis(299), &config));
        assert!(!is_click(5.0, Duration::from_millis(0), &config));
        assert!(!is_click(0.0, Duration::from_millis(300), &config));
    }

    #[test]
    fn press_on_unknown_ball_is_ignored() {
        let (mut sim, _) = sim_with_ball();
        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, 9999, Vec2::new(300.0, 400.0));
        assert!(sim.dragged.is_none());
        assert_eq!(tracker.pointer_up(&mut sim, Vec2::new(300.0, 400.0)), None);
    }

    #[test]
    fn release_over_a_removed_ball_is_not_a_selection() {
        let (mut sim, id) = sim_with_ball();
        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, id, Vec2::new(300.0, 400.0));
        // The ball completes and is filtered out while still held.
        sim.ball_mut(id).unwrap().progress = crate::config::PROGRESS_COMPLETE;
        sim.step();
        assert!(sim.ball(id).is_none());

        let selected = tracker.pointer_up(&mut sim, Vec2::new(300.0, 400.0));
        assert_eq!(selected, None);
        assert!(sim.dragged.is_none());
    }

    #[test]
    fn dragged_ball_blocks_others_as_a_static_obstacle() {
        let (mut sim, id) = sim_with_ball();
        let other = crate::ball::Ball::new("other", 360.0);
        let other_id = other.id;
        sim.balls.push(other);
        // Overlap the held ball; both radii are at least 39.5.
        if let Some(b) = sim.ball_mut(other_id) {
            b.pos = Vec2::new(340.0, 400.0);
            b.vel = Vec2::zero();
        }

        let mut tracker = PointerTracker::new();
        tracker.pointer_down(&mut sim, id, Vec2::new(300.0, 400.0));
        tracker.pointer_move(&mut sim, Vec2::new(300.0, 400.0));
        sim.step();

        let held = sim.ball(id).unwrap();
        assert_eq!(held.pos, Vec2::new(300.0, 400.0), "anchor reasserted after collisions");
        let pushed = sim.ball(other_id).unwrap();
        assert!(pushed.pos.x > 340.0, "the free ball was pushed away");
    }
}
