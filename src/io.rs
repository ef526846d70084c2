// io.rs
// Save/load of simulation state as JSON task records

use crate::commands::{self, CommandError, TaskRecord};
use crate::config::SimConfig;
use crate::simulation::Simulation;
use crate::spatial_grid::SpatialGrid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Persisted simulation state. Kinematics are deliberately not saved; a
/// loaded ball re-spawns with fresh initial kinematics through the same
/// reconcile path the external task list uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub config: SimConfig,
    #[serde(default)]
    pub frame: u64,
}

impl SavedState {
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            tasks: sim.balls.iter().map(TaskRecord::from_ball).collect(),
            config: sim.config.clone(),
            frame: sim.frame,
        }
    }

    /// Replace the simulation's config and ball set with the saved state.
    /// Validation failures (a tampered file) leave the ball set untouched.
    /// The grid is recreated so a loaded `cell_size` takes effect.
    pub fn apply_to(self, sim: &mut Simulation) -> Result<(), CommandError> {
        commands::reconcile(sim, self.tasks)?;
        sim.config = self.config;
        sim.grid = SpatialGrid::new(sim.config.cell_size);
        sim.frame = self.frame;
        Ok(())
    }
}

pub fn save_state<P: AsRef<Path>>(path: P, sim: &Simulation) -> std::io::Result<()> {
    let state = SavedState::capture(sim);
    let json = serde_json::to_string_pretty(&state)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

pub fn load_state<P: AsRef<Path>>(path: P) -> std::io::Result<SavedState> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| Error::new(ErrorKind::InvalidData, e))
}
