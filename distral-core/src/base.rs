//! Core interfaces.
mod clustering;
mod replay_memory;
pub use clustering::TrajectoryClustering;
pub use replay_memory::{ExperienceBufferBase, ReplayMemoryBase};
