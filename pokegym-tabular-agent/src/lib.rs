#![warn(missing_docs)]
//! Tabular learning agents for discrete environments.
//!
//! The crate provides two elementary controllers without any function
//! approximation:
//!
//! * [`QLearning`](qlearning::QLearning) - off-policy one-step temporal
//!   difference control over a dense value table,
//! * [`ContextualBandit`](bandit::ContextualBandit) - a contextual
//!   epsilon-greedy multi-armed bandit with incremental-mean value
//!   estimates.
//!
//! Both work on any environment whose observations discretize into an
//! index tuple and whose actions are plain indices.
pub mod bandit;
pub mod qlearning;
