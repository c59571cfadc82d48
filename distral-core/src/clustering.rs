//! Placeholder clustering.
use crate::{error::DistralError, TrajectoryClustering, TransitionBatch};
use anyhow::Result;
use log::info;

/// Clustering without an implementation.
///
/// Reports the amount of gathered experience and returns
/// [`DistralError::ClusteringUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct NullClustering;

impl<O> TrajectoryClustering<O> for NullClustering {
    fn cluster(&self, experience: &TransitionBatch<O>, n_agents: usize) -> Result<Vec<usize>> {
        info!(
            "Number of experiences gathered: {} ({} agents)",
            experience.len(),
            n_agents
        );
        Err(DistralError::ClusteringUnavailable.into())
    }
}
