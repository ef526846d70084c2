// snapshot.rs
// Per-frame render view published to the presentation layer

use crate::ball::Ball;
use crate::simulation::Simulation;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// One ball as the presentation layer sees it.
#[derive(Clone, Debug, Serialize)]
pub struct BallView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub color: [u8; 3],
    pub progress: u8,
    pub milestones_done: usize,
    pub milestones_total: usize,
    pub title: String,
}

impl BallView {
    pub fn from_ball(ball: &Ball) -> Self {
        let (milestones_done, milestones_total) = ball.milestone_counts();
        Self {
            id: ball.id,
            x: ball.pos.x,
            y: ball.pos.y,
            vx: ball.vel.x,
            vy: ball.vel.y,
            radius: ball.radius,
            color: ball.color,
            progress: ball.progress,
            milestones_done,
            milestones_total,
            title: ball.title.clone(),
        }
    }
}

/// Buffer shared between the driver thread and the render side.
pub type SharedSnapshot = Arc<Mutex<Vec<BallView>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(Vec::new()))
}

/// Copy the current ball set into the shared render buffer.
pub fn publish(sim: &Simulation, out: &SharedSnapshot) {
    let mut lock = out.lock();
    lock.clear();
    lock.extend(sim.balls.iter().map(BallView::from_ball));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::Milestone;

    #[test]
    fn publish_mirrors_ball_state() {
        let mut sim = Simulation::new();
        let mut ball = Ball::new("demo", 120.0);
        ball.progress = 30;
        ball.milestones.push(Milestone { text: "m".into(), completed: true });
        let id = ball.id;
        sim.balls.push(ball);

        let shared = shared_snapshot();
        publish(&sim, &shared);

        let views = shared.lock();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.id, id);
        assert_eq!(view.x, 120.0);
        assert_eq!(view.progress, 30);
        assert_eq!((view.milestones_done, view.milestones_total), (1, 1));
    }

    #[test]
    fn publish_clears_stale_views() {
        let mut sim = Simulation::new();
        sim.balls.push(Ball::new("a", 100.0));
        let shared = shared_snapshot();
        publish(&sim, &shared);
        sim.balls.clear();
        publish(&sim, &shared);
        assert!(shared.lock().is_empty());
    }
}
