//! Shared policy distilled from all agents.
use super::{Network, NetworkConfig};
use crate::model::SubModel;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use log::trace;
use std::path::Path;

/// Shared policy `pi0(.|s)`.
///
/// Maps a batch of states to action probabilities `[batch_size, n_actions]`.
/// Value optimizers of every agent read it through `&SharedPolicy` while
/// only the policy distiller, through `&mut SharedPolicy`, updates it. The
/// version counts completed distillation steps, so readers can tell which
/// snapshot of the parameters they used.
pub struct SharedPolicy<P>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
{
    net: Network<P>,
    version: u64,
}

impl<P> SharedPolicy<P>
where
    P: SubModel<Input = Tensor, Output = Tensor>,
{
    /// Constructs [`SharedPolicy`] at version 0.
    ///
    /// The model is expected to output a normalized distribution, e.g. an
    /// MLP with [`Activation::Softmax`](crate::Activation::Softmax).
    pub fn build(config: NetworkConfig<P::Config>, device: Device) -> Result<Self> {
        Ok(Self {
            net: Network::build(config, "pi", device)?,
            version: 0,
        })
    }

    /// Outputs action probabilities of a batch of states.
    pub fn forward(&self, obs: &Tensor, with_gradient: bool) -> Result<Tensor> {
        self.net.forward(obs, with_gradient)
    }

    /// Applies one clamped gradient step and increments the version.
    ///
    /// See [`Network::backward_step`].
    pub fn backward_step(&mut self, loss: &Tensor, grad_clip: f64) -> Result<f32> {
        let max_abs = self.net.backward_step(loss, grad_clip)?;
        self.version += 1;
        trace!("shared policy updated to version {}", self.version);
        Ok(max_abs)
    }

    /// Number of completed distillation steps.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the device of the parameters.
    pub fn device(&self) -> &Device {
        self.net.device()
    }

    /// Returns the variables of the policy.
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
