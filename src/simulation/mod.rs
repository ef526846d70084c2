// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod collision;
pub mod integrate;
pub mod ripple;
mod simulation;
pub use simulation::*;
