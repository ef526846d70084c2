// simulation/integrate.rs
// Per-ball kinematics: restoring force, air resistance, Euler step, bounds

use super::Simulation;
use crate::config;
use crate::profile_scope;

/// Advance every non-dragged ball by one frame (dt = 1).
pub fn integrate(sim: &mut Simulation) {
    profile_scope!("integrate");
    let restore_force = sim.config.restore_force;
    let air_resistance = sim.config.air_resistance;
    let bounce_damping = sim.config.bounce_damping;
    let bottom_friction = sim.config.bottom_friction;
    let viewport = sim.viewport;
    let dragged = sim.dragged.map(|d| d.id);

    let left = viewport.width * config::LEFT_BOUND_FRACTION;
    let right = viewport.width * config::RIGHT_BOUND_FRACTION;
    let top = config::HEADER_HEIGHT;
    let bottom = viewport.height - config::FOOTER_HEIGHT;

    for ball in &mut sim.balls {
        if Some(ball.id) == dragged {
            continue;
        }

        let target_y = ball.resting_y(viewport.height);
        ball.vel.y += -(ball.pos.y - target_y) * restore_force;
        ball.vel *= air_resistance;
        ball.pos += ball.vel;

        let r = ball.radius;
        if ball.pos.x - r < left {
            ball.pos.x = left + r;
            ball.vel.x = ball.vel.x.abs() * bounce_damping;
        }
        if ball.pos.x + r > right {
            ball.pos.x = right - r;
            ball.vel.x = -ball.vel.x.abs() * bounce_damping;
        }
        if ball.pos.y + r > bottom {
            ball.pos.y = bottom - r;
            ball.vel.y = -ball.vel.y.abs() * bounce_damping;
            ball.vel.x *= bottom_friction;
        }
        if ball.pos.y - r < top {
            ball.pos.y = top + r;
            ball.vel.y = ball.vel.y.abs() * bounce_damping;
        }
    }
}
