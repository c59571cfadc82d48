//! Soft action selection.
use super::{soft_policy, EpsilonSchedule, SharedPolicy, ValueEstimator};
use crate::model::SubModel;
use anyhow::{bail, Result};
use candle_core::Tensor;
use log::{trace, warn};
use rand::{distributions::WeightedIndex, rngs::SmallRng, Rng, SeedableRng};

/// Lower bound of action weights before sampling.
pub const PROB_FLOOR: f32 = 1e-15;

/// Returns `true` if any weight is negative or not finite.
pub fn has_invalid_probs(probs: &[f32]) -> bool {
    probs.iter().any(|p| !(p.is_finite() && *p >= 0.0))
}

/// Floors every weight at [`PROB_FLOOR`].
///
/// Cancellation in the soft policy can push weights to or below zero.
/// Negative or non-finite weights are reported with a warning.
pub fn floor_probs(probs: Vec<f32>) -> Vec<f32> {
    if has_invalid_probs(&probs) {
        warn!("soft policy has negative or non-finite values: {:?}", probs);
    }
    probs
        .into_iter()
        .map(|p| if p >= PROB_FLOOR { p } else { PROB_FLOOR })
        .collect()
}

/// Samples actions from the soft policy of one agent.
///
/// The policy tilts the shared policy with the agent's action values,
/// `pi_i(a|s) = pi0(a|s)^alpha * exp(beta * (Q_i(s, a) - V_i(s)))`.
pub struct ActionSelector {
    n_actions: usize,
    explorer: EpsilonSchedule,
    alpha: f64,
    beta: f64,
    rng: SmallRng,
}

impl ActionSelector {
    /// Constructs [`ActionSelector`] with a seeded random number generator.
    pub fn new(n_actions: usize, explorer: EpsilonSchedule, alpha: f64, beta: f64, seed: u64) -> Self {
        Self {
            n_actions,
            explorer,
            alpha,
            beta,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns the floored soft policy for a single observation.
    ///
    /// Both networks are evaluated without building a gradient graph.
    pub fn action_probs<Q, P>(
        &self,
        state: &Tensor,
        policy: &SharedPolicy<P>,
        model: &ValueEstimator<Q>,
    ) -> Result<Vec<f32>>
    where
        Q: SubModel<Input = Tensor, Output = Tensor>,
        P: SubModel<Input = Tensor, Output = Tensor>,
    {
        let state = state.unsqueeze(0)?;
        let q = model.forward(&state.to_device(model.device())?, false)?;
        let pi0 = policy.forward(&state.to_device(policy.device())?, false)?;
        let pi0 = pi0.to_device(q.device())?;
        let probs: Vec<f32> = soft_policy(&q, &pi0, self.alpha, self.beta)?
            .squeeze(0)?
            .to_vec1()?;

        if probs.len() != self.n_actions {
            bail!(
                "networks output {} actions, {} expected",
                probs.len(),
                self.n_actions
            );
        }

        Ok(floor_probs(probs))
    }

    /// Samples an action index for a single observation.
    ///
    /// * `state` - observation without the batch dimension.
    /// * `steps_done` - number of environment steps so far, used by the
    ///   exploration schedule.
    pub fn select_action<Q, P>(
        &mut self,
        state: &Tensor,
        policy: &SharedPolicy<P>,
        model: &ValueEstimator<Q>,
        steps_done: usize,
    ) -> Result<i64>
    where
        Q: SubModel<Input = Tensor, Output = Tensor>,
        P: SubModel<Input = Tensor, Output = Tensor>,
    {
        let probs = self.action_probs(state, policy, model)?;
        trace!(
            "step {}: eps = {:.4}, probs = {:?}",
            steps_done,
            self.explorer.eps(steps_done),
            probs
        );
        self.sample(&probs)
    }

    /// Samples an index from a categorical distribution given by weights.
    pub fn sample(&mut self, probs: &[f32]) -> Result<i64> {
        let dist = WeightedIndex::new(probs)?;
        Ok(self.rng.sample(dist) as i64)
    }
}
