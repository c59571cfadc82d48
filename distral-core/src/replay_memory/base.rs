//! Ring buffer of transitions with seeded sampling.
use super::ReplayMemoryConfig;
use crate::{error::DistralError, ExperienceBufferBase, ReplayMemoryBase, Transition};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Replay memory of a single agent.
///
/// Transitions are kept in insertion order in a ring buffer; once the
/// buffer is full the oldest transition is overwritten.
pub struct ReplayMemory<O> {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Current insertion index.
    i: usize,

    /// Storage.
    memory: Vec<Transition<O>>,

    /// See [`ReplayMemoryConfig::policy_window`].
    policy_window: usize,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<O: Clone> ReplayMemory<O> {
    /// Builds an empty memory.
    pub fn build(config: &ReplayMemoryConfig) -> Self {
        Self {
            capacity: config.capacity,
            i: 0,
            memory: Vec::with_capacity(config.capacity.min(1 << 16)),
            policy_window: config.policy_window,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Returns the capacity of the memory.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Position in `memory` of the `j`-th most recent transition.
    #[inline]
    fn recent_position(&self, j: usize) -> usize {
        let len = self.memory.len();
        if len < self.capacity {
            len - 1 - j
        } else {
            (self.i + self.capacity - 1 - j) % self.capacity
        }
    }

    fn check_size(&self, n: usize) -> Result<()> {
        if n > self.memory.len() {
            return Err(DistralError::InsufficientSamples {
                requested: n,
                available: self.memory.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl<O: Clone> ExperienceBufferBase for ReplayMemory<O> {
    type Item = Transition<O>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.capacity == 0 {
            return Err(DistralError::InvalidHyperparameter(
                "capacity of replay memory must be positive".to_string(),
            )
            .into());
        }

        if self.memory.len() < self.capacity {
            self.memory.push(tr);
        } else {
            self.memory[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
        Ok(())
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}

impl<O: Clone> ReplayMemoryBase for ReplayMemory<O> {
    fn sample(&mut self, n: usize) -> Result<Vec<Self::Item>> {
        self.check_size(n)?;
        let ixs = index::sample(&mut self.rng, self.memory.len(), n);
        Ok(ixs.into_iter().map(|ix| self.memory[ix].clone()).collect())
    }

    fn policy_sample(&mut self, n: usize) -> Result<Vec<Self::Item>> {
        self.check_size(n)?;
        let window = self.policy_window.min(self.memory.len()).max(n);
        trace!("policy_sample: n = {}, window = {}", n, window);
        let ixs = index::sample(&mut self.rng, window, n);
        Ok(ixs
            .into_iter()
            .map(|j| self.memory[self.recent_position(j)].clone())
            .collect())
    }
}
