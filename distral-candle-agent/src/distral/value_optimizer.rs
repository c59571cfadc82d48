//! One soft Q-learning step on an agent's value estimator.
use super::{soft_value, SharedPolicy, ValueEstimator};
use crate::{
    model::SubModel,
    util::{action_index, stack_states},
};
use anyhow::Result;
use candle_core::{Tensor, D};
use candle_nn::loss::mse;
use distral_core::{
    record::{Record, RecordValue},
    Hyperparams, ReplayMemoryBase, Transition, TransitionBatch,
};
use log::trace;

/// Offset added to the predicted action values before the loss.
const PRED_OFFSET: f64 = 1e-16;

/// Soft bootstrapped target `r + gamma * V(s')`, detached.
///
/// `V(s')` is the soft value of the next state with `model` as the value
/// source and `policy` as the prior. Terminal next states contribute zero
/// and are never evaluated.
pub fn soft_bootstrap_target<Q, P>(
    batch: &TransitionBatch<Tensor>,
    model: &ValueEstimator<Q>,
    policy: &SharedPolicy<P>,
    hyperparams: &Hyperparams,
) -> Result<Tensor>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
    P: SubModel<Input = Tensor, Output = Tensor>,
{
    let device = model.device();
    let non_final_next_states = batch.non_final_next_states();

    let mut next_state_values = vec![0f32; batch.len()];
    if !non_final_next_states.is_empty() {
        let xs = stack_states(&non_final_next_states, device)?;
        let q = model.forward(&xs, false)?;
        let pi0 = policy.forward(&xs.to_device(policy.device())?, false)?;
        let v: Vec<f32> = soft_value(
            &q,
            &pi0.to_device(device)?,
            hyperparams.alpha,
            hyperparams.beta,
        )?
        .to_vec1()?;

        let mut v = v.into_iter();
        for (value, non_final) in next_state_values.iter_mut().zip(batch.non_final_mask()) {
            if non_final {
                if let Some(x) = v.next() {
                    *value = x;
                }
            }
        }
    }

    let n = batch.len();
    let next_state_values = Tensor::from_vec(next_state_values, (n,), device)?;
    let reward = Tensor::from_slice(&batch.rewards[..], (n,), device)?;
    Ok(((next_state_values * hyperparams.gamma)? + reward)?.detach())
}

/// Performs at most one gradient step on `model`.
///
/// Returns `None` without touching the parameters while `memory` holds
/// fewer than `batch_size` transitions. Otherwise draws a uniform batch,
/// regresses `Q(s, a)` onto [`soft_bootstrap_target`] with the mean squared
/// error, clamps the gradients and steps the optimizer of `model`.
///
/// The returned record holds `loss_critic` and `grad_max_abs`.
pub fn optimize_model<Q, P, M>(
    memory: &mut M,
    model: &mut ValueEstimator<Q>,
    policy: &SharedPolicy<P>,
    hyperparams: &Hyperparams,
) -> Result<Option<Record>>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
    P: SubModel<Input = Tensor, Output = Tensor>,
    M: ReplayMemoryBase<Item = Transition<Tensor>>,
{
    if memory.len() < hyperparams.batch_size {
        trace!(
            "skip value optimization: {} < {}",
            memory.len(),
            hyperparams.batch_size
        );
        return Ok(None);
    }

    let batch = TransitionBatch::from_transitions(memory.sample(hyperparams.batch_size)?);
    let device = model.device().clone();

    let pred = {
        let obs = stack_states(&batch.states, &device)?;
        let act = action_index(&batch.actions, &device)?;
        let q = model.forward(&obs, true)?;
        (q.gather(&act, D::Minus1)?.squeeze(D::Minus1)? + PRED_OFFSET)?
    };
    let tgt = soft_bootstrap_target(&batch, model, policy, hyperparams)?;

    let loss = mse(&pred, &tgt)?;
    let grad_max_abs = model.backward_step(&loss, hyperparams.grad_clip)?;
    let loss_critic = loss.to_scalar::<f32>()?;

    Ok(Some(Record::from_slice(&[
        ("loss_critic", RecordValue::Scalar(loss_critic)),
        ("grad_max_abs", RecordValue::Scalar(grad_max_abs)),
    ])))
}
