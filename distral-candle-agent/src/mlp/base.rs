use super::MlpConfig;
use crate::model::SubModel;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Returns vector of linear modules from [`MlpConfig`].
fn create_linear_layers(prefix: &str, vs: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let mut dims = vec![config.in_dim];
    dims.extend(config.units.iter().cloned());
    dims.push(config.out_dim);
    let vs = vs.pp(prefix);

    dims.windows(2)
        .enumerate()
        .map(|(i, w)| -> Result<Linear> {
            Ok(linear(w[0], w[1], vs.pp(format!("ln{}", i)))?)
        })
        .collect()
}

/// Multilayer perceptron with ReLU activation function.
///
/// Observations are flattened from the second dimension before the first
/// layer, so grid observations of shape `[batch, ...]` are accepted as well.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    layers: Vec<Linear>,
}

impl SubModel for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let mut xs = xs.to_device(&self.device)?.flatten_from(1)?;
        let n_layers = self.layers.len();

        for layer in self.layers[..n_layers - 1].iter() {
            xs = layer.forward(&xs)?.relu()?;
        }

        let xs = self.layers[n_layers - 1].forward(&xs)?;
        self.config.activation_out.forward(&xs)
    }

    fn build(vs: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vs.device().clone();
        let layers = create_linear_layers("mlp", vs, &config)?;

        Ok(Mlp {
            config,
            device,
            layers,
        })
    }
}
