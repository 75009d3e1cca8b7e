//! Platform glue: the fixed-step frame clock
//!
//! Hosts feed real elapsed time in; the clock says how many fixed
//! simulation steps to run. A long hitch is capped so the simulation never
//! spirals trying to catch up.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add elapsed time and return how many steps to run now
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Drop whatever could not be simulated this frame
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
