// app/driver.rs
// The frame loop: a cancellable repeating task on a dedicated thread

use super::input::PointerTracker;
use crate::commands::{self, SimCommand};
use crate::simulation::Simulation;
use crate::snapshot::{self, SharedSnapshot};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use ultraviolet::Vec2;

/// Signals crossing back out of the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Progress crossed the completion threshold and the ball was removed;
    /// the persistence layer should archive the task.
    Completed { id: u64 },
    /// A click (not a drag) landed on the ball.
    Selected { id: u64 },
}

/// Handle to the running frame loop. Dropping it stops and joins the loop,
/// so teardown can never leak a perpetually rescheduling task.
pub struct DriverHandle {
    commands: Sender<SimCommand>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
    snapshot: SharedSnapshot,
}

impl DriverHandle {
    pub fn commands(&self) -> Sender<SimCommand> {
        self.commands.clone()
    }

    pub fn send(&self, cmd: SimCommand) {
        let _ = self.commands.send(cmd);
    }

    pub fn snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    /// Cancel the loop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the frame loop over an existing simulation. Physics steps at the
/// configured cadence; snapshots publish every `frame_skip`-th frame.
pub fn spawn(mut sim: Simulation) -> std::io::Result<(DriverHandle, Receiver<SimEvent>)> {
    let (cmd_tx, cmd_rx) = channel();
    let (event_tx, event_rx) = channel();
    let stop = Arc::new(AtomicBool::new(false));
    let snapshot = snapshot::shared_snapshot();

    let loop_stop = Arc::clone(&stop);
    let loop_snapshot = Arc::clone(&snapshot);
    let join = thread::Builder::new()
        .name("ocean-ball-sim".into())
        .spawn(move || run_loop(&mut sim, cmd_rx, event_tx, loop_stop, loop_snapshot))?;

    Ok((
        DriverHandle {
            commands: cmd_tx,
            stop,
            join: Some(join),
            snapshot,
        },
        event_rx,
    ))
}

fn run_loop(
    sim: &mut Simulation,
    commands: Receiver<SimCommand>,
    events: Sender<SimEvent>,
    stop: Arc<AtomicBool>,
    shared: SharedSnapshot,
) {
    let mut tracker = PointerTracker::new();
    let mut next_frame = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        while let Ok(cmd) = commands.try_recv() {
            dispatch(sim, &mut tracker, &events, cmd);
        }

        // Cadence comes from the live config so a LoadState takes effect.
        let frame_period = Duration::from_secs_f64(1.0 / sim.config.frame_rate_hz.max(1) as f64);
        let frame_skip = sim.config.frame_skip.max(1);

        let removed = sim.step();
        for id in removed {
            let _ = events.send(SimEvent::Completed { id });
        }

        if sim.frame % frame_skip == 0 {
            snapshot::publish(sim, &shared);
        }

        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
            next_frame += frame_period;
        } else {
            // Fell behind; skip the lost time instead of bursting frames.
            next_frame = now + frame_period;
        }
    }

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().print_and_clear();
}

fn dispatch(
    sim: &mut Simulation,
    tracker: &mut PointerTracker,
    events: &Sender<SimEvent>,
    cmd: SimCommand,
) {
    match cmd {
        SimCommand::PointerDown { id, x, y } => tracker.pointer_down(sim, id, Vec2::new(x, y)),
        SimCommand::PointerMove { x, y } => tracker.pointer_move(sim, Vec2::new(x, y)),
        SimCommand::PointerUp { x, y } => {
            if let Some(id) = tracker.pointer_up(sim, Vec2::new(x, y)) {
                let _ = events.send(SimEvent::Selected { id });
            }
        }
        other => {
            if let Err(err) = commands::process_command(other, sim) {
                warn!("command rejected: {err}");
            }
        }
    }
}
