// profiler.rs
// Scoped frame profiler, active only with the `profiling` feature

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulates wall time per named section plus the number of frames seen,
/// so reports can show per-frame averages.
pub struct Profiler {
    timings: HashMap<&'static str, (Duration, u64)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
        }
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let entry = self.timings.entry(name).or_insert((Duration::ZERO, 0));
        entry.0 += elapsed;
        entry.1 += 1;
    }

    /// Sections sorted by total time, descending.
    pub fn report(&self) -> Vec<(&'static str, Duration, u64)> {
        let mut rows: Vec<_> = self
            .timings
            .iter()
            .map(|(name, (total, hits))| (*name, *total, *hits))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    pub fn print_and_clear(&mut self) {
        for (name, total, hits) in self.report() {
            let avg = total / hits.max(1) as u32;
            log::info!("{name:<18} total {total:?} avg {avg:?} over {hits} scopes");
        }
        self.timings.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProfilerGuard {
    #[cfg_attr(not(feature = "profiling"), allow(dead_code))]
    name: &'static str,
    #[cfg_attr(not(feature = "profiling"), allow(dead_code))]
    start: Instant,
}

/// Start a profiling section; the guard reports into the global profiler on
/// drop.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().record(self.name, self.start.elapsed());
    }
}

/// Profile a scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
