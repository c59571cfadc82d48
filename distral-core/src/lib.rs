#![warn(missing_docs)]
//! Core abstractions for multi-task reinforcement learning with a distilled
//! shared policy.
//!
//! This crate is independent of any tensor backend. It provides the
//! transition record exchanged between agents and their replay memories,
//! the column-wise [`TransitionBatch`], the replay memory interfaces with a
//! seeded implementation, training records and the clustering interface.
pub mod error;
mod hyperparams;
pub use hyperparams::Hyperparams;
pub mod record;
pub mod replay_memory;

mod base;
pub use base::{ExperienceBufferBase, ReplayMemoryBase, TrajectoryClustering};

mod clustering;
pub use clustering::NullClustering;

mod transition;
pub use transition::{Transition, TransitionBatch};
