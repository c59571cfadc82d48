//! Value estimator of a single agent.
use super::{Network, NetworkConfig};
use crate::model::SubModel;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use std::path::Path;

/// Action-value estimator `Q_i(s, .)` of one agent.
///
/// Maps a batch of states `[batch_size, ...]` to action values
/// `[batch_size, n_actions]`. Each agent owns its estimator and the
/// optimizer bound to its parameters.
pub struct ValueEstimator<Q>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
{
    net: Network<Q>,
}

impl<Q> ValueEstimator<Q>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
{
    /// Constructs [`ValueEstimator`].
    pub fn build(config: NetworkConfig<Q::Config>, device: Device) -> Result<Self> {
        Ok(Self {
            net: Network::build(config, "q", device)?,
        })
    }

    /// Outputs the action values of a batch of states.
    pub fn forward(&self, obs: &Tensor, with_gradient: bool) -> Result<Tensor> {
        self.net.forward(obs, with_gradient)
    }

    /// See [`Network::backward_step`].
    pub fn backward_step(&mut self, loss: &Tensor, grad_clip: f64) -> Result<f32> {
        self.net.backward_step(loss, grad_clip)
    }

    /// Returns the device of the parameters.
    pub fn device(&self) -> &Device {
        self.net.device()
    }

    /// Returns the variables of the estimator.
    pub fn get_varmap(&self) -> &VarMap {
        self.net.get_varmap()
    }

    /// Saves the parameters.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.net.save(path)
    }

    /// Loads the parameters.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.net.load(path)
    }
}
