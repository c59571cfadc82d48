//! Interface of neural networks used in Distral agents.
use anyhow::Result;
use candle_nn::VarBuilder;

/// Neural network model not owing its [`VarMap`] internally.
///
/// Both the value estimators and the shared policy are built on this trait:
/// a stateless `forward` over a batch of states with parameters held in a
/// [`VarMap`] owned by the caller.
///
/// [`VarMap`]: https://docs.rs/candle-nn/0.8.4/candle_nn/var_map/struct.VarMap.html
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds [`SubModel`] with [`VarBuilder`] and [`SubModel::Config`].
    ///
    /// [`VarBuilder`]: https://docs.rs/candle-nn/0.8.4/candle_nn/var_builder/type.VarBuilder.html
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input) -> Result<Self::Output>;
}
