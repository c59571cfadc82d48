//! Hyperparameters shared by all components.
use crate::error::DistralError;
use serde::{Deserialize, Serialize};

/// Read-only hyperparameters of Distral.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub struct Hyperparams {
    /// Weight of the shared policy in the soft value, `> 0`.
    pub alpha: f64,

    /// Inverse temperature, `> 0`.
    pub beta: f64,

    /// Discount factor, in `(0, 1]`.
    pub gamma: f64,

    /// Number of transitions per optimization step.
    pub batch_size: usize,

    /// Gradient elements are clamped into `[-grad_clip, grad_clip]`.
    pub grad_clip: f64,
}

impl Default for Hyperparams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 5.0,
            gamma: 0.999,
            batch_size: 128,
            grad_clip: 500.0,
        }
    }
}

impl Hyperparams {
    /// Sets `alpha`.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets `beta`.
    pub fn beta(mut self, v: f64) -> Self {
        self.beta = v;
        self
    }

    /// Sets `gamma`.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the gradient clamping bound.
    pub fn grad_clip(mut self, v: f64) -> Self {
        self.grad_clip = v;
        self
    }

    /// Checks the ranges of all values.
    pub fn validate(&self) -> Result<(), DistralError> {
        let invalid = |msg: String| Err(DistralError::InvalidHyperparameter(msg));

        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return invalid(format!("alpha must be positive, got {}", self.alpha));
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return invalid(format!("beta must be positive, got {}", self.beta));
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return invalid(format!("gamma must be in (0, 1], got {}", self.gamma));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".to_string());
        }
        if !(self.grad_clip > 0.0) {
            return invalid(format!("grad_clip must be positive, got {}", self.grad_clip));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Hyperparams::default().validate().is_ok());
        assert!(Hyperparams::default().gamma(1.0).validate().is_ok());

        assert!(Hyperparams::default().alpha(0.0).validate().is_err());
        assert!(Hyperparams::default().beta(-1.0).validate().is_err());
        assert!(Hyperparams::default().beta(f64::NAN).validate().is_err());
        assert!(Hyperparams::default().gamma(0.0).validate().is_err());
        assert!(Hyperparams::default().gamma(1.01).validate().is_err());
        assert!(Hyperparams::default().batch_size(0).validate().is_err());
        assert!(Hyperparams::default().grad_clip(0.0).validate().is_err());
    }
}
