//! Utilities.
use anyhow::Result;
use candle_core::{backprop::GradStore, Device, Tensor, Var};
use log::trace;

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;
}

/// Negative slope of [`leaky_relu`].
pub const NEGATIVE_SLOPE: f64 = 0.01;

/// Leaky ReLU, `max(x, 0.01 * x)`.
pub fn leaky_relu(xs: &Tensor) -> candle_core::Result<Tensor> {
    xs.maximum(&(xs * NEGATIVE_SLOPE)?)
}

/// Clamps every gradient element of `vars` into `[-bound, bound]` in place.
///
/// Returns the largest absolute value of the clamped gradients, `0` if no
/// variable received a gradient.
pub fn clamp_grads(grads: &mut GradStore, vars: &[Var], bound: f64) -> Result<f32> {
    let mut max_abs = 0f32;

    for var in vars.iter() {
        if let Some(grad) = grads.remove(var.as_tensor()) {
            let grad = grad.clamp(-bound, bound)?;
            let m = grad.abs()?.flatten_all()?.max(0)?.to_scalar::<f32>()?;
            max_abs = max_abs.max(m);
            grads.insert(var.as_tensor(), grad);
        }
    }

    trace!("max abs gradient after clamping: {}", max_abs);
    Ok(max_abs)
}

/// Stacks observations along a new batch dimension.
pub fn stack_states<T: AsRef<Tensor>>(states: &[T], device: &Device) -> Result<Tensor> {
    Ok(Tensor::stack(states, 0)?.to_device(device)?)
}

/// Converts actions into an index tensor of shape `[batch_size, 1]`.
pub fn action_index(actions: &[i64], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(actions, (actions.len(), 1), device)?)
}

/// Discount weights `gamma^time`.
pub fn discount_weights(gamma: f64, times: &[u32], device: &Device) -> Result<Tensor> {
    let w = times
        .iter()
        .map(|&t| gamma.powf(t as f64) as f32)
        .collect::<Vec<_>>();
    Ok(Tensor::from_vec(w, (times.len(),), device)?)
}
