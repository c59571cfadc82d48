//! Exploration schedule.
use serde::{Deserialize, Serialize};

/// Exponentially decaying epsilon.
///
/// `eps(t) = eps_end + (eps_start - eps_end) * exp(-t / eps_decay)`
///
/// The schedule is carried along with action selection for reporting; the
/// soft policy itself already explores through the inverse temperature.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub struct EpsilonSchedule {
    /// Epsilon at step 0.
    pub eps_start: f64,

    /// Asymptotic epsilon.
    pub eps_end: f64,

    /// Decay constant in steps.
    pub eps_decay: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            eps_start: 0.9,
            eps_end: 0.05,
            eps_decay: 5.0,
        }
    }
}

impl EpsilonSchedule {
    /// Constructs the schedule.
    pub fn new(eps_start: f64, eps_end: f64, eps_decay: f64) -> Self {
        Self {
            eps_start,
            eps_end,
            eps_decay,
        }
    }

    /// Returns epsilon after `steps_done` steps.
    pub fn eps(&self, steps_done: usize) -> f64 {
        self.eps_end
            + (self.eps_start - self.eps_end) * (-(steps_done as f64) / self.eps_decay).exp()
    }
}
