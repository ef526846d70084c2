// app/mod.rs
// Wiring: demo entry point that seeds tasks and runs the driver

use crate::ball::Ball;
use crate::commands::SimCommand;
use crate::config;
use crate::simulation::{Simulation, Viewport};
use log::info;
use std::time::Duration;

pub mod driver;
pub mod input;

pub use driver::{spawn, DriverHandle, SimEvent};

const DEMO_VIEWPORT: Viewport = Viewport { width: 1280.0, height: 800.0 };
const DEMO_SECONDS: u64 = 10;

/// Seed balls spread across the effective width, one per demo task.
pub fn default_tasks(viewport_width: f32) -> Vec<Ball> {
    let left = viewport_width * config::LEFT_BOUND_FRACTION;
    let right = viewport_width * config::RIGHT_BOUND_FRACTION;
    (1..=5)
        .map(|i| Ball::new(format!("Task {i}"), left + fastrand::f32() * (right - left)))
        .collect()
}

/// Run the demo: five seeded tasks, a ripple, ten seconds of simulation,
/// then a clean stop.
pub fn run() -> std::io::Result<()> {
    let mut sim = Simulation::new();
    sim.viewport = DEMO_VIEWPORT;
    sim.balls = default_tasks(sim.viewport.width);

    let (handle, events) = driver::spawn(sim)?;
    handle.send(SimCommand::Ripple {
        x: DEMO_VIEWPORT.width / 2.0,
        y: DEMO_VIEWPORT.height / 2.0,
    });

    for second in 1..=DEMO_SECONDS {
        std::thread::sleep(Duration::from_secs(1));
        while let Ok(event) = events.try_recv() {
            match event {
                SimEvent::Completed { id } => info!("task {id} completed, archive it"),
                SimEvent::Selected { id } => info!("task {id} selected"),
            }
        }
        let view = handle.snapshot();
        let balls = view.lock();
        if let Some(first) = balls.first() {
            info!(
                "t={second}s: {} balls afloat, first at ({:.1}, {:.1})",
                balls.len(),
                first.x,
                first.y
            );
        } else {
            info!("t={second}s: no balls afloat");
        }
    }

    handle.stop();
    Ok(())
}
