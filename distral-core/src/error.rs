//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum DistralError {
    /// More transitions were requested than the memory holds.
    #[error("Insufficient samples: requested {requested}, available {available}")]
    InsufficientSamples {
        /// Number of requested transitions.
        requested: usize,
        /// Number of stored transitions.
        available: usize,
    },

    /// A hyperparameter is outside of its valid range.
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// The agent index does not exist.
    #[error("Unknown agent {agent_id}, the number of agents is {n_agents}")]
    UnknownAgent {
        /// Requested agent index.
        agent_id: usize,
        /// Number of agents.
        n_agents: usize,
    },

    /// Trajectory clustering has no implementation.
    #[error("Trajectory clustering is not available")]
    ClusteringUnavailable,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
