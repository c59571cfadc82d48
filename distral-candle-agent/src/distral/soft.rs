//! Soft value and soft policy.
//!
//! With `z(a) = alpha * log pi0(a) + beta * Q(a)`,
//!
//! ```text
//! V    = log( sum_a pi0(a)^alpha * exp(beta * Q(a)) ) / beta = logsumexp(z) / beta
//! pi_i = pi0(a)^alpha * exp(beta * (Q(a) - V))           = exp(z - logsumexp(z))
//! ```
//!
//! The log-sum-exp is shifted by its maximum, so large `beta * Q` does not
//! overflow.
use anyhow::Result;
use candle_core::{Tensor, D};

fn tilted_logits(q: &Tensor, pi0: &Tensor, alpha: f64, beta: f64) -> Result<Tensor> {
    Ok(((pi0.log()? * alpha)? + (q * beta)?)?)
}

/// `logsumexp` over the last dimension, keeping it.
fn log_partition(z: &Tensor) -> Result<Tensor> {
    let m = z.max_keepdim(D::Minus1)?;
    let s = z.broadcast_sub(&m)?.exp()?.sum_keepdim(D::Minus1)?.log()?;
    Ok((s + m)?)
}

/// Soft value of a batch, `[batch_size, n_actions] -> [batch_size]`.
///
/// * `q` - action values.
/// * `pi0` - action probabilities of the shared policy.
pub fn soft_value(q: &Tensor, pi0: &Tensor, alpha: f64, beta: f64) -> Result<Tensor> {
    let z = tilted_logits(q, pi0, alpha, beta)?;
    Ok((log_partition(&z)?.squeeze(D::Minus1)? / beta)?)
}

/// Soft policy of a batch, `[batch_size, n_actions] -> [batch_size, n_actions]`.
pub fn soft_policy(q: &Tensor, pi0: &Tensor, alpha: f64, beta: f64) -> Result<Tensor> {
    let z = tilted_logits(q, pi0, alpha, beta)?;
    Ok(z.broadcast_sub(&log_partition(&z)?)?.exp()?)
}
