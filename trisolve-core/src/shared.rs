//! Lock-guarded engine for hosts that tick and render on different threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::{SimulationEngine, Snapshot};
use crate::error::SolverError;

/// One exclusive lock around the whole engine. `advance`, `initialize`,
/// and `snapshot` each hold it for their full duration, so readers never
/// observe a half-rotated layer set.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<SimulationEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SimulationEngine) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulationEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self) -> Result<(), SolverError> {
        self.lock().advance()
    }

    pub fn initialize(&self) {
        self.lock().initialize();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().current_layer().to_snapshot()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut SimulationEngine) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use std::thread;

    #[test]
    fn concurrent_ticks_and_reads_see_whole_steps() {
        let engine = SimulationEngine::start(&SimulationConfig::default()).unwrap();
        let shared = SharedEngine::new(engine);

        let ticker = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    shared.advance().unwrap();
                }
            })
        };

        let mut last_step = 0;
        for _ in 0..200 {
            let snap = shared.snapshot();
            assert!(snap.step >= last_step);
            assert_eq!(snap.values.len(), 101);
            assert_eq!(snap.values[0], 0.0);
            assert_eq!(snap.values[100], 0.0);
            last_step = snap.step;
        }

        ticker.join().unwrap();
        assert_eq!(shared.snapshot().step, 500);

        shared.initialize();
        assert_eq!(shared.with(|e| e.time_step()), 0);
    }
}
