//! Trajectory clustering interface.
use crate::TransitionBatch;
use anyhow::Result;

/// Partitions aggregated experience into clusters.
///
/// Intended for task identification on the whole-memory accumulated during
/// policy distillation. The clustering policy is left to implementors.
pub trait TrajectoryClustering<O> {
    /// Returns a cluster index for every state in `experience`.
    fn cluster(&self, experience: &TransitionBatch<O>, n_agents: usize) -> Result<Vec<usize>>;
}
