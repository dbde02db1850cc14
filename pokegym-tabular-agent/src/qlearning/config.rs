//! Configuration of [`QLearning`](super::QLearning).
use super::EpsilonGreedy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearning`](super::QLearning).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QLearningConfig {
    /// Cardinality of each state dimension.
    pub space_size: Vec<usize>,

    /// The number of actions.
    pub n_actions: usize,

    /// Discount factor.
    pub gamma: f32,

    /// Learning rate of the value updates.
    pub lr: f32,

    /// Exploration schedule used in training mode.
    pub explorer: EpsilonGreedy,

    /// Random seed of the agent.
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            space_size: vec![],
            n_actions: 0,
            gamma: 1.0,
            lr: 0.01,
            explorer: EpsilonGreedy::default(),
            seed: 42,
        }
    }
}

impl QLearningConfig {
    /// Sets the cardinality of each state dimension.
    pub fn space_size(mut self, v: Vec<usize>) -> Self {
        self.space_size = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the learning rate.
    pub fn lr(mut self, v: f32) -> Self {
        self.lr = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`QLearningConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QLearningConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_qlearning_config() -> Result<()> {
        let config = QLearningConfig::default()
            .space_size(vec![3, 3])
            .n_actions(3)
            .lr(0.5);

        let dir = TempDir::new("qlearning_config")?;
        let path = dir.path().join("qlearning_config.yaml");

        config.save(&path)?;
        let config_ = QLearningConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
