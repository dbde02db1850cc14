//! Configuration of [`ContextualBandit`](super::ContextualBandit).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ContextualBandit`](super::ContextualBandit).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ContextualBanditConfig {
    /// The number of arms.
    pub n_arms: usize,

    /// Cardinality of each context dimension.
    pub context_dims: Vec<usize>,

    /// Probability of choosing a random arm.
    pub epsilon: f64,

    /// Random seed of the agent.
    pub seed: u64,
}

impl Default for ContextualBanditConfig {
    fn default() -> Self {
        Self {
            n_arms: 0,
            context_dims: vec![],
            epsilon: 0.1,
            seed: 42,
        }
    }
}

impl ContextualBanditConfig {
    /// Sets the number of arms.
    pub fn n_arms(mut self, v: usize) -> Self {
        self.n_arms = v;
        self
    }

    /// Sets the cardinality of each context dimension.
    pub fn context_dims(mut self, v: Vec<usize>) -> Self {
        self.context_dims = v;
        self
    }

    /// Sets the probability of choosing a random arm.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`ContextualBanditConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ContextualBanditConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
