//! Frame time sources

use std::time::Instant;

/// Yields the wall-clock seconds since the previous call
pub trait Clock {
    fn elapsed_secs(&mut self) -> f64;
}

/// Monotonic clock backed by `Instant`
#[derive(Debug)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

/// Scripted clock for headless runs and tests: returns `step` every call
#[derive(Debug, Clone)]
pub struct ManualClock {
    step: f64,
}

impl ManualClock {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&mut self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let mut clock = SystemClock::new();
        assert!(clock.elapsed_secs() >= 0.0);
        assert!(clock.elapsed_secs() >= 0.0);
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new(0.5);
        assert_eq!(clock.elapsed_secs(), 0.5);
        assert_eq!(clock.elapsed_secs(), 0.5);
    }
}
