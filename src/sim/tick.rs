//! Fixed timestep scheduler
//!
//! Turns variable frame deltas into a whole number of constant-size physics
//! steps. Frame rate never changes simulation speed.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedTimestep {
    /// Seconds per physics step
    period: f64,
    /// Accumulated, not yet simulated time
    countdown: f64,
    /// Catch-up cap per frame
    max_steps: u32,
    /// Total steps run since creation
    ticks: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    /// `period` must be positive; `max_steps` of zero is treated as one.
    pub fn new(period: f64, max_steps: u32) -> Self {
        Self {
            period: if period > 0.0 { period } else { SIM_DT },
            countdown: 0.0,
            max_steps: max_steps.max(1),
            ticks: 0,
        }
    }

    pub fn from_hz(hz: u32, max_steps: u32) -> Self {
        Self::new(1.0 / hz.max(1) as f64, max_steps)
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Residual time waiting for the next step
    #[inline]
    pub fn countdown(&self) -> f64 {
        self.countdown
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulate `elapsed` seconds and run as many whole steps as fit.
    ///
    /// At most `max_steps` run per call. If the cap is reached with a full
    /// period or more still pending, the whole periods are discarded and only
    /// the fractional residue is kept. Returns the number of steps run.
    pub fn advance<F: FnMut()>(&mut self, elapsed: f64, mut step: F) -> u32 {
        self.advance_while(elapsed, || {
            step();
            true
        })
    }

    /// Like [`advance`](Self::advance), but `step` reports whether stepping
    /// should go on. Once it returns false the remaining whole periods of
    /// this call are discarded. The step that returned false is counted.
    pub fn advance_while<F: FnMut() -> bool>(&mut self, elapsed: f64, mut step: F) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.countdown += elapsed;
        }

        let mut steps = 0;
        let mut halted = false;
        while self.countdown >= self.period && steps < self.max_steps {
            let keep_going = step();
            self.countdown -= self.period;
            self.ticks += 1;
            steps += 1;
            if !keep_going {
                halted = true;
                break;
            }
        }

        if self.countdown >= self.period {
            let dropped = (self.countdown / self.period).floor() as u64;
            self.countdown %= self.period;
            if halted {
                log::debug!("stepping halted after {steps}, dropped {dropped} pending");
            } else {
                log::debug!(
                    "physics fell behind: ran {} steps, dropped {} more",
                    steps,
                    dropped
                );
            }
        }

        steps
    }

    /// Forget any pending time (after a pause or screen change)
    pub fn reset_countdown(&mut self) {
        self.countdown = 0.0;
    }
}
