//! Configuration of [`ReplayMemory`](super::ReplayMemory).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayMemory`](super::ReplayMemory).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayMemoryConfig {
    /// Maximum number of stored transitions.
    pub capacity: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,

    /// Number of most recent transitions from which `policy_sample` draws.
    ///
    /// The window is widened to the requested sample size when needed.
    pub policy_window: usize,
}

impl Default for ReplayMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            seed: 42,
            policy_window: 1_000,
        }
    }
}

impl ReplayMemoryConfig {
    /// Sets the capacity of the memory.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the window of `policy_sample`.
    pub fn policy_window(mut self, policy_window: usize) -> Self {
        self.policy_window = policy_window;
        self
    }

    /// Constructs [`ReplayMemoryConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReplayMemoryConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_replay_memory_config() -> Result<()> {
        let config = ReplayMemoryConfig::default()
            .capacity(500)
            .seed(7)
            .policy_window(64);

        let dir = TempDir::new("replay_memory_config")?;
        let path = dir.path().join("replay_memory_config.yaml");
        config.save(&path)?;
        let config_ = ReplayMemoryConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
