//! Configuration of Distral agents.
use super::{EpsilonSchedule, NetworkConfig};
use crate::Device;
use anyhow::Result;
use distral_core::{error::DistralError, Hyperparams};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Distral`](super::Distral).
///
/// `QC` and `PC` are the model configurations of the value estimators and
/// the shared policy. All value estimators are built from the same
/// configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DistralConfig<QC, PC> {
    /// Configuration of the value estimator of each agent.
    pub value_config: NetworkConfig<QC>,

    /// Configuration of the shared policy.
    pub policy_config: NetworkConfig<PC>,

    /// Coupling, discount, batch size and gradient bound.
    pub hyperparams: Hyperparams,

    /// Number of agents.
    pub n_agents: usize,

    /// Number of discrete actions.
    pub n_actions: usize,

    /// Exploration schedule reported by the action selector.
    pub explorer: EpsilonSchedule,

    /// Seed of the action selector.
    pub seed: u64,

    /// Device of all networks, CPU if `None`.
    pub device: Option<Device>,
}

impl<QC, PC> Default for DistralConfig<QC, PC> {
    fn default() -> Self {
        Self {
            value_config: NetworkConfig::default(),
            policy_config: NetworkConfig::default(),
            hyperparams: Hyperparams::default(),
            n_agents: 1,
            n_actions: 1,
            explorer: EpsilonSchedule::default(),
            seed: 42,
            device: None,
        }
    }
}

impl<QC, PC> DistralConfig<QC, PC>
where
    QC: DeserializeOwned + Serialize,
    PC: DeserializeOwned + Serialize,
{
    /// Sets the configuration of the value estimators.
    pub fn value_config(mut self, v: NetworkConfig<QC>) -> Self {
        self.value_config = v;
        self
    }

    /// Sets the configuration of the shared policy.
    pub fn policy_config(mut self, v: NetworkConfig<PC>) -> Self {
        self.policy_config = v;
        self
    }

    /// Sets hyperparameters.
    pub fn hyperparams(mut self, v: Hyperparams) -> Self {
        self.hyperparams = v;
        self
    }

    /// Sets the number of agents.
    pub fn n_agents(mut self, v: usize) -> Self {
        self.n_agents = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: EpsilonSchedule) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = Some(v);
        self
    }

    /// Checks hyperparameters and counts.
    pub fn validate(&self) -> Result<(), DistralError> {
        self.hyperparams.validate()?;
        if self.n_agents == 0 {
            return Err(DistralError::InvalidHyperparameter(
                "n_agents must be positive".to_string(),
            ));
        }
        if self.n_actions == 0 {
            return Err(DistralError::InvalidHyperparameter(
                "n_actions must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`DistralConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of Distral agent from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`DistralConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of Distral agent into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}
