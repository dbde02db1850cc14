//! Tabular Q-learning agent.
mod base;
mod config;
mod explorer;

pub use base::QLearning;
pub use config::QLearningConfig;
pub use explorer::EpsilonGreedy;
