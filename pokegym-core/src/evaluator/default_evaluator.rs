//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use std::marker::PhantomData;

/// A default implementation of the [`Evaluator`] trait.
///
/// This evaluator runs a specified number of episodes and calculates the
/// average return across all episodes. Environments in this library report
/// the cumulative episode reward at every step, so the return of an episode
/// is the reward of its final step. Each episode is started with
/// [`Env::reset_with_index`], making evaluation runs reproducible.
pub struct DefaultEvaluator<E: Env, P: Policy<E>> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,

    phantom: PhantomData<P>,
}

impl<E: Env, P: Policy<E>> Evaluator<E, P> for DefaultEvaluator<E, P> {
    fn evaluate(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act)?;
                if step.is_done() {
                    r_total += step.reward[0];
                    break;
                }
                prev_obs = step.obs;
            }
        }

        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env, P: Policy<E>> DefaultEvaluator<E, P> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration of the environment.
    /// * `seed` - Random seed for environment initialization.
    /// * `n_episodes` - The number of episodes to run during evaluation.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
            phantom: PhantomData,
        })
    }
}
