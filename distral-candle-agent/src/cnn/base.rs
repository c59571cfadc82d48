use super::GridCnnConfig;
use crate::{model::SubModel, util::leaky_relu};
use anyhow::{bail, Result};
use candle_core::{DType::F32, Device, Tensor};
use candle_nn::{
    conv2d, linear,
    sequential::{seq, Sequential},
    Conv2dConfig, Module, VarBuilder,
};

/// Convolutional network for small grid worlds.
///
/// Three valid convolutions with kernel sizes 2, 3 and 3 (5, 10 and 10
/// channels) followed by a linear head. Inputs are `[batch, channels,
/// height, width]`; a missing channel dimension is added.
pub struct GridCnn {
    config: GridCnnConfig,
    device: Device,
    seq: Sequential,
}

impl GridCnn {
    fn create_net(vb: &VarBuilder, config: &GridCnnConfig) -> Result<Sequential> {
        if config.height < 6 || config.width < 6 {
            bail!(
                "grid of {}x{} is too small for GridCnn, 6x6 at least",
                config.height,
                config.width
            );
        }
        let head_dim = 10 * (config.height - 5) * (config.width - 5);
        let c = Conv2dConfig::default();

        let seq = seq()
            .add_fn(|xs| xs.to_dtype(F32))
            .add(conv2d(config.in_channels, 5, 2, c, vb.pp("c1"))?)
            .add_fn(leaky_relu)
            .add(conv2d(5, 10, 3, c, vb.pp("c2"))?)
            .add_fn(leaky_relu)
            .add(conv2d(10, 10, 3, c, vb.pp("c3"))?)
            .add_fn(|xs| leaky_relu(xs)?.flatten_from(1))
            .add(linear(head_dim, config.out_dim, vb.pp("head"))?);

        Ok(seq)
    }
}

impl SubModel for GridCnn {
    type Config = GridCnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vb.device().clone();
        let seq = Self::create_net(&vb.pp("cnn"), &config)?;

        Ok(Self {
            config,
            device,
            seq,
        })
    }

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let xs = xs.to_device(&self.device)?;
        let xs = match xs.rank() {
            3 => xs.unsqueeze(1)?,
            _ => xs,
        };
        let xs = self.seq.forward(&xs)?;
        self.config.activation_out.forward(&xs)
    }
}
