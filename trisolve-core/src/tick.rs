//! Tick sources that drive [`crate::SimulationEngine::run`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Reference cadence, about 33 ticks per second.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(30);

/// Something that decides when the next step happens.
///
/// Returning `false` stops the run; there is no other way to cancel.
pub trait TickSource {
    fn next_tick(&mut self) -> bool;
}

/// Shared flag that stops a tick source from another thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fixed-rate ticks, sleeping between them. Late ticks fire immediately
/// without trying to catch up on the missed ones.
#[derive(Debug)]
pub struct FixedRate {
    interval: Duration,
    remaining: Option<u64>,
    deadline: Option<Instant>,
    stop: StopHandle,
}

impl FixedRate {
    pub fn new(interval: Duration) -> Self {
        FixedRate {
            interval,
            remaining: None,
            deadline: None,
            stop: StopHandle::default(),
        }
    }

    pub fn limited(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl Default for FixedRate {
    fn default() -> Self {
        FixedRate::new(DEFAULT_INTERVAL)
    }
}

impl TickSource for FixedRate {
    fn next_tick(&mut self) -> bool {
        if self.stop.is_stopped() || !take_tick(&mut self.remaining) {
            return false;
        }

        let now = Instant::now();
        let deadline = self.deadline.unwrap_or(now + self.interval);
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.deadline = Some(deadline + self.interval);
        } else {
            self.deadline = Some(now + self.interval);
        }
        !self.stop.is_stopped()
    }
}

/// Ticks as fast as the caller can step, for headless batch runs.
#[derive(Debug, Default)]
pub struct Unpaced {
    remaining: Option<u64>,
    stop: StopHandle,
}

impl Unpaced {
    pub fn limited(ticks: u64) -> Self {
        Unpaced {
            remaining: Some(ticks),
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl TickSource for Unpaced {
    fn next_tick(&mut self) -> bool {
        !self.stop.is_stopped() && take_tick(&mut self.remaining)
    }
}

fn take_tick(remaining: &mut Option<u64>) -> bool {
    match remaining {
        Some(0) => false,
        Some(n) => {
            *n -= 1;
            true
        }
        None => true,
    }
}
