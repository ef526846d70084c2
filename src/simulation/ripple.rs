// simulation/ripple.rs
// One-shot radial impulse from a background interaction

use super::Simulation;
use ultraviolet::Vec2;

/// Every ball strictly inside the ripple radius receives an outward impulse
/// of `(radius - dist) / divisor`. A ball exactly at the origin has no
/// defined direction and is skipped. Applied once, not integrated per frame;
/// a dragged ball is affected too, but the driver's anchor reassertion
/// cancels it for that ball.
pub fn apply_ripple(sim: &mut Simulation, origin: Vec2) {
    let radius = sim.config.ripple_radius;
    let divisor = sim.config.ripple_force_divisor;
    for ball in &mut sim.balls {
        let d = ball.pos - origin;
        let dist = d.mag();
        if dist > 0.0 && dist < radius {
            let force = (radius - dist) / divisor;
            ball.vel += d / dist * force;
        }
    }
}
