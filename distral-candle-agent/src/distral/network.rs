//! Trainable network owning its parameters and optimizer.
use crate::{
    model::SubModel,
    opt::{Optimizer, OptimizerConfig},
    util::clamp_grads,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Network`].
pub struct NetworkConfig<C> {
    /// Configuration of the model.
    pub model_config: Option<C>,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl<C> Default for NetworkConfig<C> {
    fn default() -> Self {
        Self {
            model_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<C> NetworkConfig<C>
where
    C: DeserializeOwned + Serialize,
{
    /// Sets configurations of the model.
    pub fn model_config(mut self, v: C) -> Self {
        self.model_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`NetworkConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`NetworkConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A [`SubModel`] together with its [`VarMap`] and optimizer.
pub struct Network<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
{
    device: Device,
    varmap: VarMap,
    vars: Vec<Var>,
    model: M,
    opt: Optimizer,
}

impl<M> Network<M>
where
    M: SubModel<Input = Tensor, Output = Tensor>,
{
    /// Constructs [`Network`], variable names are prefixed with `prefix`.
    pub fn build(config: NetworkConfig<M::Config>, prefix: &str, device: Device) -> Result<Self> {
        let model_config = config.model_config.context("model_config is not set.")?;
        let varmap = VarMap::new();
        let model = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device).pp(prefix);
            M::build(vb, model_config)?
        };
        let vars = varmap.all_vars();
        let opt = config.opt_config.build(vars.clone())?;

        Ok(Self {
            device,
            varmap,
            vars,
            model,
            opt,
        })
    }

    /// Evaluates the model on a batch.
    ///
    /// With `with_gradient == false` the output is detached from the
    /// computation graph and never contributes to a backward pass.
    pub fn forward(&self, xs: &Tensor, with_gradient: bool) -> Result<Tensor> {
        let ys = self.model.forward(xs)?;
        match with_gradient {
            true => Ok(ys),
            false => Ok(ys.detach()),
        }
    }

    /// Backpropagates `loss`, clamps every gradient element into
    /// `[-grad_clip, grad_clip]` and applies one optimizer step.
    ///
    /// Returns the largest absolute gradient element after clamping.
    pub fn backward_step(&mut self, loss: &Tensor, grad_clip: f64) -> Result<f32> {
        let mut grads = loss.backward()?;
        let max_abs = clamp_grads(&mut grads, &self.vars, grad_clip)?;
        self.opt.step(&grads)?;
        Ok(max_abs)
    }

    /// Returns the device of the parameters.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the variables of the model.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save network to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load network from {:?}", path.as_ref());
        Ok(())
    }
}
