use super::{
    optimize_model, optimize_policy, ActionSelector, DistralConfig, SharedPolicy, ValueEstimator,
};
use crate::{model::SubModel, util::OutDim};
use anyhow::Result;
use candle_core::Tensor;
use distral_core::{
    error::DistralError, record::Record, Hyperparams, ReplayMemoryBase, TrajectoryClustering,
    Transition, TransitionBatch,
};
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn check_out_dim<C: OutDim>(name: &str, config: Option<&C>, n_actions: usize) -> Result<()> {
    if let Some(config) = config {
        if config.get_out_dim() != n_actions {
            return Err(DistralError::InvalidHyperparameter(format!(
                "out_dim of {} is {}, n_actions is {}",
                name,
                config.get_out_dim(),
                n_actions
            ))
            .into());
        }
    }
    Ok(())
}

/// Distral agent.
///
/// Holds one [`ValueEstimator`] per agent, the [`SharedPolicy`], the
/// [`ActionSelector`] and the whole-memory accumulator. The accumulator
/// holds the transitions drawn by the latest [`Distral::opt_policy`] only.
///
/// Replay memories are owned by the caller and passed in per call.
pub struct Distral<Q, P>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
    P: SubModel<Input = Tensor, Output = Tensor>,
{
    models: Vec<ValueEstimator<Q>>,
    policy: SharedPolicy<P>,
    selector: ActionSelector,
    hyperparams: Hyperparams,
    whole_memory: TransitionBatch<Tensor>,
}

impl<Q, P> Distral<Q, P>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
    P: SubModel<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs [`Distral`] after validating `config`.
    ///
    /// The output dimensions of both model configurations must equal
    /// `n_actions`.
    pub fn build(config: DistralConfig<Q::Config, P::Config>) -> Result<Self> {
        config.validate()?;
        check_out_dim("value_config", config.value_config.model_config.as_ref(), config.n_actions)?;
        check_out_dim("policy_config", config.policy_config.model_config.as_ref(), config.n_actions)?;
        let device = config.device.unwrap_or_default().to_candle()?;

        let models = (0..config.n_agents)
            .map(|_| ValueEstimator::build(config.value_config.clone(), device.clone()))
            .collect::<Result<Vec<_>>>()?;
        let policy = SharedPolicy::build(config.policy_config, device)?;
        let selector = ActionSelector::new(
            config.n_actions,
            config.explorer,
            config.hyperparams.alpha,
            config.hyperparams.beta,
            config.seed,
        );

        Ok(Self {
            models,
            policy,
            selector,
            hyperparams: config.hyperparams,
            whole_memory: TransitionBatch::empty(),
        })
    }

    fn check_agent(&self, agent_id: usize) -> Result<(), DistralError> {
        if agent_id >= self.models.len() {
            return Err(DistralError::UnknownAgent {
                agent_id,
                n_agents: self.models.len(),
            });
        }
        Ok(())
    }

    /// Number of agents.
    pub fn n_agents(&self) -> usize {
        self.models.len()
    }

    /// Value estimator of an agent.
    pub fn model(&self, agent_id: usize) -> Result<&ValueEstimator<Q>> {
        self.check_agent(agent_id)?;
        Ok(&self.models[agent_id])
    }

    /// Shared policy.
    pub fn policy(&self) -> &SharedPolicy<P> {
        &self.policy
    }

    /// Hyperparameters.
    pub fn hyperparams(&self) -> &Hyperparams {
        &self.hyperparams
    }

    /// Samples an action of `agent_id` for a single observation.
    pub fn sample(&mut self, agent_id: usize, state: &Tensor, steps_done: usize) -> Result<i64> {
        self.check_agent(agent_id)?;
        self.selector
            .select_action(state, &self.policy, &self.models[agent_id], steps_done)
    }

    /// Soft Q-learning step of `agent_id` on its memory, see [`optimize_model`].
    pub fn opt_agent<M>(&mut self, agent_id: usize, memory: &mut M) -> Result<Option<Record>>
    where
        M: ReplayMemoryBase<Item = Transition<Tensor>>,
    {
        self.check_agent(agent_id)?;
        optimize_model(
            memory,
            &mut self.models[agent_id],
            &self.policy,
            &self.hyperparams,
        )
    }

    /// Distillation step over the memories of all agents, see [`optimize_policy`].
    ///
    /// The accumulator is cleared before the step.
    pub fn opt_policy<M>(&mut self, memories: &mut [M]) -> Result<Record>
    where
        M: ReplayMemoryBase<Item = Transition<Tensor>>,
    {
        self.whole_memory = TransitionBatch::empty();
        optimize_policy(
            &mut self.policy,
            memories,
            &self.hyperparams,
            &mut self.whole_memory,
        )
    }

    /// Experience gathered by the latest policy distillation.
    pub fn whole_memory(&self) -> &TransitionBatch<Tensor> {
        &self.whole_memory
    }

    /// Takes the gathered experience, leaving an empty accumulator.
    pub fn take_whole_memory(&mut self) -> TransitionBatch<Tensor> {
        std::mem::take(&mut self.whole_memory)
    }

    /// Clusters the gathered experience into at most `n_agents` groups.
    pub fn cluster<C>(&self, clustering: &C) -> Result<Vec<usize>>
    where
        C: TrajectoryClustering<Tensor>,
    {
        clustering.cluster(&self.whole_memory, self.models.len())
    }

    /// Saves the parameters of all networks in `path`.
    ///
    /// Files are `qnet{i}.safetensors` for the agents and
    /// `policy.safetensors` for the shared policy.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;

        let mut paths = Vec::with_capacity(self.models.len() + 1);
        for (i, model) in self.models.iter().enumerate() {
            let p = path.join(format!("qnet{}.safetensors", i));
            model.save(&p)?;
            paths.push(p);
        }
        let p = path.join("policy.safetensors");
        self.policy.save(&p)?;
        paths.push(p);

        info!("Save Distral agent into {:?}", path);
        Ok(paths)
    }

    /// Loads the parameters saved with [`Distral::save`].
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        let path = path.as_ref();
        for (i, model) in self.models.iter_mut().enumerate() {
            model.load(path.join(format!("qnet{}.safetensors", i)))?;
        }
        self.policy.load(path.join("policy.safetensors"))?;

        info!("Load Distral agent from {:?}", path);
        Ok(())
    }
}
