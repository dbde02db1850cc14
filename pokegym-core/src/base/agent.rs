//! Agent.
use super::{Env, Policy, Transition};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step on a single transition.
    ///
    /// The transitions arrive in the order the environment produced them;
    /// there is no replay buffer in this library. Returns `None` if the
    /// agent skipped the update, for example because it is in evaluation
    /// mode.
    fn opt(&mut self, transition: &Transition<E>) -> Option<Record>;

    /// Save the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files consisting the agent
    /// in the directory. For example, the tabular Q-learning agent saves
    /// its value table as a YAML file.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}
