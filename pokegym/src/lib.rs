//! A typed-battle reinforcement learning sandbox in Rust.
//!
//! Pokegym consists of the following crates:
//!
//! * Core
//!   * `pokegym-core` provides basic traits and functions generic to
//!     environments and reinforcement learning (RL) agents, along with the
//!     online [`Trainer`](pokegym_core::Trainer) and
//!     [`Evaluator`](pokegym_core::Evaluator).
//! * Environment
//!   * `pokegym-battle-env` implements the three variants of the
//!     one-on-one typed battle environment
//!     ([`BattleEnv`](pokegym_battle_env::BattleEnv)).
//! * Agent
//!   * `pokegym-tabular-agent` includes tabular RL agents without any
//!     function approximation: one-step Q-learning
//!     ([`QLearning`](pokegym_tabular_agent::qlearning::QLearning)) and a
//!     contextual epsilon-greedy bandit
//!     ([`ContextualBandit`](pokegym_tabular_agent::bandit::ContextualBandit)).
//! * `pokegym` is just a collection of examples.

pub use pokegym_battle_env as battle_env;
pub use pokegym_core as rl_core;
pub use pokegym_tabular_agent as tabular_agent;
