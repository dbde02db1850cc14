//! Contextual epsilon-greedy multi-armed bandit.
mod base;
mod config;

pub use base::ContextualBandit;
pub use config::ContextualBanditConfig;
