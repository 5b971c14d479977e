//! Elapsed-time polling for the interrupt/time-limit check, grounded
//! on the original engine's `Timer` (`set()` records a base instant,
//! `get()` returns seconds elapsed since).

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    base: Option<Instant>,
}

impl Timer {
    pub fn new() -> Timer {
        Timer { base: None }
    }

    pub fn set(&mut self) {
        self.base = Some(Instant::now());
    }

    /// Seconds elapsed since the last `set()`. Returns `0.0` if never
    /// set, matching the all-zero default of the original's
    /// default-constructed time point in practice (searches always
    /// call `set()` in `before()` first).
    pub fn elapsed_seconds(&self) -> f64 {
        match self.base {
            Some(base) => base.elapsed().as_secs_f64(),
            None => 0.0,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}
