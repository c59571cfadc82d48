//! Convolutional network for grid observations.
mod base;
mod config;
pub use base::GridCnn;
pub use config::GridCnnConfig;
