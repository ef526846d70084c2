// commands.rs
// SimCommand processing: validated, discriminated mutations of the Simulation

use crate::ball::{self, Ball, Milestone};
use crate::config;
use crate::io;
use crate::simulation::{ripple, Simulation, Viewport};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::PathBuf;
use thiserror::Error;
use ultraviolet::Vec2;

/// External task record, as produced by the persistence layer and the state
/// files. Carries no kinematics; a ball materialized from a record adopts
/// fresh initial kinematics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: u64,
    pub title: String,
    pub density: f32,
    pub progress: u8,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl TaskRecord {
    pub fn from_ball(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            title: ball.title.clone(),
            density: ball.density,
            progress: ball.progress,
            milestones: ball.milestones.to_vec(),
            color: Some(ball.color),
        }
    }

    fn validate(&self) -> Result<(), CommandError> {
        let inner = if !self.density.is_finite()
            || self.density < config::DENSITY_MIN
            || self.density > config::DENSITY_MAX
        {
            Some(CommandError::DensityOutOfBand(self.density))
        } else if self.progress > config::PROGRESS_COMPLETE {
            Some(CommandError::ProgressOutOfRange(self.progress))
        } else {
            None
        };
        match inner {
            Some(source) => Err(CommandError::InvalidRecord {
                id: self.id,
                source: Box::new(source),
            }),
            None => Ok(()),
        }
    }

    fn into_ball(self, x: f32) -> Ball {
        Ball {
            id: self.id,
            pos: Vec2::new(x, config::INITIAL_BALL_Y),
            vel: ball::initial_velocity(),
            radius: ball::radius_for_density(self.density),
            density: self.density,
            progress: self.progress,
            title: self.title,
            color: self.color.unwrap_or_else(ball::random_color),
            milestones: SmallVec::from_vec(self.milestones),
        }
    }
}

/// Targeted, validated update of one ball.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BallUpdate {
    MoveTo { x: f32, y: f32 },
    SetVelocity { vx: f32, vy: f32 },
    SetProgress { progress: u8 },
    SetDensity { density: f32 },
}

pub enum SimCommand {
    /// Full task-list reconciliation after an external round-trip. Known ids
    /// keep their in-flight kinematics, new ids spawn fresh, absent ids drop.
    SyncTasks { records: Vec<TaskRecord> },
    /// Create a ball locally. `x = None` picks a spot in the creation band.
    AddTask { title: String, x: Option<f32> },
    RemoveTask { id: u64 },
    DeleteAll,
    Update { id: u64, update: BallUpdate },
    /// One-shot radial impulse from a background interaction.
    Ripple { x: f32, y: f32 },
    SetViewport { width: f32, height: f32 },
    /// Pointer lifecycle, viewport-local coordinates. Consumed by the
    /// driver's pointer tracker, not by `process_command`.
    PointerDown { id: u64, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    SaveState { path: PathBuf },
    LoadState { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("coordinate ({0}, {1}) is not finite")]
    NonFiniteCoordinate(f32, f32),
    #[error("velocity ({0}, {1}) is not finite")]
    NonFiniteVelocity(f32, f32),
    #[error("density {0} is outside [0.15, 0.8]")]
    DensityOutOfBand(f32),
    #[error("progress {0} is past the completion sentinel")]
    ProgressOutOfRange(u8),
    #[error("no ball with id {0}")]
    UnknownBall(u64),
    #[error("invalid record for task {id}")]
    InvalidRecord {
        id: u64,
        #[source]
        source: Box<CommandError>,
    },
    #[error("state io failed")]
    Io(#[from] std::io::Error),
}

fn check_finite(x: f32, y: f32) -> Result<(), CommandError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(CommandError::NonFiniteCoordinate(x, y))
    }
}

/// Process a single SimCommand. A rejected command leaves the simulation
/// untouched.
pub fn process_command(cmd: SimCommand, sim: &mut Simulation) -> Result<(), CommandError> {
    match cmd {
        SimCommand::SyncTasks { records } => reconcile(sim, records),

        SimCommand::AddTask { title, x } => {
            if let Some(x) = x {
                check_finite(x, 0.0)?;
            }
            let x = x.unwrap_or_else(|| sim.spawn_x());
            sim.balls.push(Ball::new(title, x));
            Ok(())
        }

        SimCommand::RemoveTask { id } => {
            let before = sim.balls.len();
            sim.balls.retain(|b| b.id != id);
            if sim.balls.len() == before {
                return Err(CommandError::UnknownBall(id));
            }
            if sim.dragged.map(|d| d.id) == Some(id) {
                sim.dragged = None;
            }
            Ok(())
        }

        SimCommand::DeleteAll => {
            sim.balls.clear();
            sim.dragged = None;
            Ok(())
        }

        SimCommand::Update { id, update } => handle_update(sim, id, update),

        SimCommand::Ripple { x, y } => {
            check_finite(x, y)?;
            ripple::apply_ripple(sim, Vec2::new(x, y));
            Ok(())
        }

        SimCommand::SetViewport { width, height } => {
            check_finite(width, height)?;
            // Zero is accepted; the step loop skips degenerate viewports.
            sim.viewport = Viewport::new(width, height);
            Ok(())
        }

        SimCommand::SaveState { path } => {
            io::save_state(path, sim)?;
            Ok(())
        }

        SimCommand::LoadState { path } => {
            let state = io::load_state(path)?;
            state.apply_to(sim)
        }

        // Pointer events are routed to the driver's tracker before dispatch.
        SimCommand::PointerDown { .. }
        | SimCommand::PointerMove { .. }
        | SimCommand::PointerUp { .. } => Ok(()),
    }
}

fn handle_update(sim: &mut Simulation, id: u64, update: BallUpdate) -> Result<(), CommandError> {
    match &update {
        BallUpdate::MoveTo { x, y } => check_finite(*x, *y)?,
        BallUpdate::SetVelocity { vx, vy } => {
            if !vx.is_finite() || !vy.is_finite() {
                return Err(CommandError::NonFiniteVelocity(*vx, *vy));
            }
        }
        BallUpdate::SetProgress { progress } => {
            if *progress > config::PROGRESS_COMPLETE {
                return Err(CommandError::ProgressOutOfRange(*progress));
            }
        }
        BallUpdate::SetDensity { density } => {
            if !density.is_finite()
                || *density < config::DENSITY_MIN
                || *density > config::DENSITY_MAX
            {
                return Err(CommandError::DensityOutOfBand(*density));
            }
        }
    }

    let ball = sim.ball_mut(id).ok_or(CommandError::UnknownBall(id))?;
    match update {
        BallUpdate::MoveTo { x, y } => ball.pos = Vec2::new(x, y),
        BallUpdate::SetVelocity { vx, vy } => ball.vel = Vec2::new(vx, vy),
        // Removal is deferred to the step loop's filter pass.
        BallUpdate::SetProgress { progress } => ball.progress = progress,
        // Re-maps the resting line only; radius stays as derived at creation.
        BallUpdate::SetDensity { density } => ball.density = density,
    }
    Ok(())
}

/// Replace the ball set from an external record batch. The whole batch is
/// validated up front; any invalid record rejects it with the previous state
/// untouched.
pub fn reconcile(sim: &mut Simulation, records: Vec<TaskRecord>) -> Result<(), CommandError> {
    for record in &records {
        record.validate()?;
    }
    let mut next = Vec::with_capacity(records.len());
    for record in records {
        if let Some(existing) = sim.ball(record.id) {
            let mut kept = existing.clone();
            kept.title = record.title;
            kept.progress = record.progress;
            kept.density = record.density;
            kept.milestones = SmallVec::from_vec(record.milestones);
            if let Some(color) = record.color {
                kept.color = color;
            }
            next.push(kept);
        } else {
            let x = sim.spawn_x();
            next.push(record.into_ball(x));
        }
    }
    sim.balls = next;
    if let Some(anchor) = sim.dragged {
        if sim.ball(anchor.id).is_none() {
            sim.dragged = None;
        }
    }
    Ok(())
}
