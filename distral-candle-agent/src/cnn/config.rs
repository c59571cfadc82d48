use crate::{util::OutDim, Activation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`GridCnn`](super::GridCnn).
pub struct GridCnnConfig {
    /// Height of the grid.
    pub height: usize,

    /// Width of the grid.
    pub width: usize,

    /// Number of input channels.
    pub in_channels: usize,

    /// Output dimension, equal to the number of actions.
    pub out_dim: usize,

    /// Activation applied to the output.
    pub activation_out: Activation,
}

impl GridCnnConfig {
    /// Creates configuration for a single-channel grid.
    pub fn new(height: usize, width: usize, out_dim: usize, activation_out: Activation) -> Self {
        Self {
            height,
            width,
            in_channels: 1,
            out_dim,
            activation_out,
        }
    }

    /// Sets the number of input channels.
    pub fn in_channels(mut self, v: usize) -> Self {
        self.in_channels = v;
        self
    }
}

impl OutDim for GridCnnConfig {
    fn get_out_dim(&self) -> usize {
        self.out_dim
    }
}
