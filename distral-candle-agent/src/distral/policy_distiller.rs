//! Distillation of all agents into the shared policy.
use super::SharedPolicy;
use crate::{
    model::SubModel,
    util::{action_index, discount_weights, stack_states},
};
use anyhow::Result;
use candle_core::{DType, Tensor, D};
use distral_core::{
    record::{Record, RecordValue},
    Hyperparams, ReplayMemoryBase, Transition, TransitionBatch,
};
use log::{info, trace};

/// Time-discounted log-likelihood `sum_j gamma^time_j * log pi0(a_j|s_j)`.
fn discounted_log_likelihood<P>(
    policy: &SharedPolicy<P>,
    batch: &TransitionBatch<Tensor>,
    gamma: f64,
) -> Result<Tensor>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
{
    let device = policy.device();
    let obs = stack_states(&batch.states, device)?;
    let act = action_index(&batch.actions, device)?;
    let w = discount_weights(gamma, &batch.times, device)?;

    let log_p = policy
        .forward(&obs, true)?
        .gather(&act, D::Minus1)?
        .squeeze(D::Minus1)?
        .log()?;
    Ok((log_p * w)?.sum_all()?)
}

/// Performs exactly one gradient step on the shared policy.
///
/// For every memory, in order, draws `min(batch_size, len)` transitions with
/// [`ReplayMemoryBase::policy_sample`], appends them to `whole_memory` and
/// subtracts their discounted log-likelihood from the loss. The summed loss
/// of all memories is backpropagated once. A memory with no transitions
/// contributes nothing, the step and the version increment happen anyway.
///
/// The returned record holds `loss_policy`, `grad_max_abs`, `n_samples`
/// (transitions drawn in this call) and `policy_version` (after the step).
pub fn optimize_policy<P, M>(
    policy: &mut SharedPolicy<P>,
    memories: &mut [M],
    hyperparams: &Hyperparams,
    whole_memory: &mut TransitionBatch<Tensor>,
) -> Result<Record>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
    M: ReplayMemoryBase<Item = Transition<Tensor>>,
{
    let mut loss = Tensor::zeros((), DType::F32, policy.device())?;
    let mut n_samples = 0;

    for (i, memory) in memories.iter_mut().enumerate() {
        let n = hyperparams.batch_size.min(memory.len());
        info!("distill {} transitions from environment {}", n, i);
        if n == 0 {
            continue;
        }

        let batch = TransitionBatch::from_transitions(memory.policy_sample(n)?);
        let cur_loss = discounted_log_likelihood(policy, &batch, hyperparams.gamma)?;
        loss = (loss - cur_loss)?;
        n_samples += batch.len();
        whole_memory.append(batch);
    }

    let grad_max_abs = policy.backward_step(&loss, hyperparams.grad_clip)?;
    let loss_policy = loss.to_scalar::<f32>()?;
    trace!(
        "loss_policy = {}, whole memory holds {} transitions",
        loss_policy,
        whole_memory.len()
    );

    Ok(Record::from_slice(&[
        ("loss_policy", RecordValue::Scalar(loss_policy)),
        ("grad_max_abs", RecordValue::Scalar(grad_max_abs)),
        ("n_samples", RecordValue::Scalar(n_samples as f32)),
        ("policy_version", RecordValue::Scalar(policy.version() as f32)),
    ]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        distral::NetworkConfig,
        mlp::{Mlp, MlpConfig},
        opt::OptimizerConfig,
        Activation,
    };
    use candle_core::Device;
    use distral_core::{
        replay_memory::{ReplayMemory, ReplayMemoryConfig},
        ExperienceBufferBase,
    };
    use test_log::test;

    fn policy() -> Result<SharedPolicy<Mlp>> {
        let config = NetworkConfig::default()
            .model_config(MlpConfig::new(2, vec![8], 3, Activation::Softmax))
            .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
        SharedPolicy::build(config, Device::Cpu)
    }

    fn memory(agent_id: usize, n: usize) -> Result<ReplayMemory<Tensor>> {
        let mut memory = ReplayMemory::build(&ReplayMemoryConfig::default().seed(agent_id as u64));
        for i in 0..n {
            let x = (agent_id * 100 + i) as f32;
            let state = Tensor::from_slice(&[x, 1.0], (2,), &Device::Cpu)?;
            memory.push(Transition::new(state, (i % 3) as i64, None, 0.0, i as u32, agent_id))?;
        }
        Ok(memory)
    }

    #[test]
    fn test_one_step_per_call() -> Result<()> {
        let mut policy = policy()?;
        let hp = Hyperparams::default().batch_size(4);

        for n_envs in [1usize, 3, 5].iter() {
            let mut memories = (0..*n_envs)
                .map(|i| memory(i, 10))
                .collect::<Result<Vec<_>>>()?;
            let version = policy.version();
            let mut whole_memory = TransitionBatch::empty();

            let record = optimize_policy(&mut policy, &mut memories, &hp, &mut whole_memory)?;
            assert_eq!(policy.version(), version + 1);
            assert_eq!(record.get_scalar("policy_version")?, (version + 1) as f32);
            assert_eq!(record.get_scalar("n_samples")?, (4 * n_envs) as f32);
            assert_eq!(whole_memory.len(), 4 * n_envs);
        }
        Ok(())
    }

    #[test]
    fn test_whole_memory_keeps_environment_order() -> Result<()> {
        let mut policy = policy()?;
        let hp = Hyperparams::default().batch_size(3);
        let mut memories = vec![memory(0, 5)?, memory(1, 2)?, memory(2, 4)?];

        // Transitions from a previous call are kept.
        let mut whole_memory = TransitionBatch::from_transitions(vec![Transition::new(
            Tensor::zeros((2,), DType::F32, &Device::Cpu)?,
            0,
            None,
            0.0,
            0,
            9,
        )]);
        optimize_policy(&mut policy, &mut memories, &hp, &mut whole_memory)?;

        assert_eq!(whole_memory.agent_ids, vec![9, 0, 0, 0, 1, 1, 2, 2, 2]);
        assert_eq!(whole_memory.states.len(), 9);
        assert_eq!(whole_memory.rewards.len(), 9);
        Ok(())
    }

    #[test]
    fn test_empty_memory_contributes_nothing() -> Result<()> {
        let mut policy = policy()?;
        let hp = Hyperparams::default().batch_size(4);
        let mut memories = vec![memory(0, 0)?, memory(1, 6)?];
        let mut whole_memory = TransitionBatch::empty();

        let record = optimize_policy(&mut policy, &mut memories, &hp, &mut whole_memory)?;
        assert_eq!(whole_memory.len(), 4);
        assert!(whole_memory.agent_ids.iter().all(|&i| i == 1));
        assert_eq!(record.get_scalar("n_samples")?, 4.0);
        assert_eq!(policy.version(), 1);

        // Negative log-likelihood of probabilities is non-negative.
        let loss = record.get_scalar("loss_policy")?;
        assert!(loss.is_finite() && loss >= 0.0);
        Ok(())
    }

    #[test]
    fn test_all_memories_empty() -> Result<()> {
        let mut policy = policy()?;
        let hp = Hyperparams::default();
        let mut memories = vec![memory(0, 0)?, memory(1, 0)?];
        let mut whole_memory = TransitionBatch::empty();

        let record = optimize_policy(&mut policy, &mut memories, &hp, &mut whole_memory)?;
        assert!(whole_memory.is_empty());
        assert_eq!(record.get_scalar("loss_policy")?, 0.0);
        assert_eq!(record.get_scalar("grad_max_abs")?, 0.0);
        assert_eq!(policy.version(), 1);
        Ok(())
    }

    #[test]
    fn test_distillation_increases_likelihood() -> Result<()> {
        let mut policy = policy()?;
        let hp = Hyperparams::default().batch_size(4).gamma(1.0);
        let state = Tensor::from_slice(&[0.5f32, 1.0], (2,), &Device::Cpu)?;
        let mut memory = ReplayMemory::build(&ReplayMemoryConfig::default());
        for _ in 0..4 {
            memory.push(Transition::new(state.clone(), 2, None, 0.0, 0, 0))?;
        }
        let mut memories = vec![memory];

        let p = |policy: &SharedPolicy<Mlp>| -> Result<f32> {
            let probs: Vec<f32> = policy
                .forward(&state.unsqueeze(0)?, false)?
                .squeeze(0)?
                .to_vec1()?;
            Ok(probs[2])
        };
        let before = p(&policy)?;
        for _ in 0..20 {
            optimize_policy(&mut policy, &mut memories, &hp, &mut TransitionBatch::empty())?;
        }
        assert!(p(&policy)? > before);
        Ok(())
    }
}
