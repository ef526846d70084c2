pub mod ball;
pub mod commands;
pub mod config;
pub mod io;
pub mod profiler;
pub mod simulation;
pub mod snapshot;
pub mod spatial_grid;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
