//! Distral agents implemented with [candle](https://crates.io/crates/candle-core).
//!
//! Several task-specific agents each learn an action-value estimator while a
//! single shared policy is distilled from all agents' experience. The shared
//! policy in turn regularizes every agent through the soft value
//!
//! ```text
//! V(s) = log( sum_a pi0(a|s)^alpha * exp(beta * Q(s, a)) ) / beta
//! ```
//!
//! See [`distral`] for the action selector, the value optimizer and the
//! policy distiller.
pub mod cnn;
pub mod distral;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod util;
use anyhow::Result;
use candle_core::{Tensor, D};
use candle_nn::ops::softmax;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Device {
    /// Returns the corresponding [`candle_core::Device`].
    pub fn to_candle(self) -> Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Activation applied to the output of a network.
pub enum Activation {
    /// No activation, used for action values.
    None,

    /// Softmax over the last dimension, used for action probabilities.
    Softmax,

    /// Leaky ReLU followed by softmax over the last dimension.
    LeakySoftmax,
}

impl Activation {
    /// Applies the activation.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Self::None => Ok(xs.clone()),
            Self::Softmax => Ok(softmax(xs, D::Minus1)?),
            Self::LeakySoftmax => Ok(softmax(&util::leaky_relu(xs)?, D::Minus1)?),
        }
    }
}
