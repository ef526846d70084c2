// simulation/collision.rs
// Pairwise overlap detection and impulse-based resolution via the grid

use super::Simulation;
use crate::ball::Ball;
use crate::profile_scope;

/// Rebuild the spatial grid from post-integration positions and resolve
/// every overlapping pair once. Each unordered pair is visited a single
/// time (`i < j`); the dragged ball is not special-cased here, the driver
/// reasserts its anchor after this pass.
pub fn collide(sim: &mut Simulation) {
    profile_scope!("collide");
    sim.grid.rebuild(&sim.balls);
    let damping = sim.config.collision_damping;
    for i in 0..sim.balls.len() {
        let neighbors = sim.grid.neighbors_of(&sim.balls, i);
        for j in neighbors {
            if j <= i {
                continue;
            }
            resolve(&mut sim.balls, i, j, damping);
        }
    }
}

/// Push an overlapping pair apart by half the overlap each and exchange a
/// damped impulse if the pair is approaching. All quantities derive from
/// pre-correction positions. Exact coincidence (dist = 0) has no defined
/// normal and is treated as no collision.
fn resolve(balls: &mut [Ball], i: usize, j: usize, damping: f32) {
    let (pa, va, ra) = (balls[i].pos, balls[i].vel, balls[i].radius);
    let (pb, vb, rb) = (balls[j].pos, balls[j].vel, balls[j].radius);

    let d = pb - pa;
    let dist_sq = d.mag_sq();
    let min_dist = ra + rb;
    if dist_sq <= 0.0 || dist_sq >= min_dist * min_dist {
        return;
    }

    let dist = dist_sq.sqrt();
    let normal = d / dist;
    let half_overlap = (min_dist - dist) * 0.5;
    balls[i].pos -= normal * half_overlap;
    balls[j].pos += normal * half_overlap;

    // Relative velocity along the unnormalized separation; dividing by
    // dist^2 makes the impulse equivalent to using the unit normal.
    let approach = (vb - va).dot(d);
    if approach < 0.0 {
        let impulse = approach / dist_sq;
        balls[i].vel += d * impulse * damping;
        balls[j].vel -= d * impulse * damping;
    }
}
