//! Contextual epsilon-greedy bandit.
use super::config::ContextualBanditConfig;
use anyhow::Result;
use fastrand::Rng;
use log::info;
use ndarray::{Array1, ArrayD, IxDyn};
use pokegym_core::{
    record::{Record, RecordValue},
    Agent, Configurable, Env, Policy, Transition,
};
use serde::{Deserialize, Serialize};
use std::{fs, marker::PhantomData, path::Path};

/// On-disk representation of the value tables.
#[derive(Debug, Deserialize, Serialize)]
struct ContextualBanditParams {
    shape: Vec<usize>,
    q_values: Vec<f32>,
    action_counts: Vec<f32>,
}

/// A contextual multi-armed bandit with epsilon-greedy arm selection.
///
/// Value estimates are kept per `(arm, context)` cell in a dense table of
/// shape `(n_arms, *context_dims)` and updated with an incremental mean;
/// the per-arm visit count is the Robbins-Monro step size denominator.
pub struct ContextualBandit<E> {
    n_arms: usize,
    epsilon: f64,
    q_values: ArrayD<f32>,
    action_counts: Array1<f32>,
    train: bool,
    rng: Rng,
    phantom: PhantomData<E>,
}

impl<E> ContextualBandit<E> {
    fn index(action: usize, context: &[usize]) -> IxDyn {
        let mut ix = vec![action];
        ix.extend_from_slice(context);
        IxDyn(&ix)
    }

    /// The estimated value of an arm for the given context.
    pub fn value(&self, action: usize, context: &[usize]) -> f32 {
        self.q_values[Self::index(action, context)]
    }

    /// The number of times an arm was selected and updated.
    pub fn action_count(&self, action: usize) -> f32 {
        self.action_counts[action]
    }

    fn argmax_first(&self, context: &[usize]) -> usize {
        let mut best = 0;
        for a in 1..self.n_arms {
            if self.value(a, context) > self.value(best, context) {
                best = a;
            }
        }
        best
    }

    /// Chooses an arm with an epsilon-greedy policy.
    ///
    /// With probability `epsilon` the arm is uniform over all arms;
    /// otherwise it is the arm with the highest estimated value for the
    /// given context, ties broken by the first encountered maximum.
    pub fn select_action(&mut self, context: &[usize]) -> usize {
        if self.rng.f64() < self.epsilon {
            self.rng.usize(0..self.n_arms)
        } else {
            self.argmax_first(context)
        }
    }

    /// Updates the value estimate of the `(action, context)` cell with an
    /// incremental mean over the rewards seen for it.
    pub fn update(&mut self, action: usize, context: &[usize], reward: f32) {
        self.action_counts[action] += 1.0;
        let ix = Self::index(action, context);
        let delta = reward - self.q_values[&ix];
        self.q_values[&ix] += delta / self.action_counts[action];
    }
}

impl<E> Configurable for ContextualBandit<E> {
    type Config = ContextualBanditConfig;

    fn build(config: Self::Config) -> Self {
        let mut shape = vec![config.n_arms];
        shape.extend_from_slice(&config.context_dims);

        Self {
            n_arms: config.n_arms,
            epsilon: config.epsilon,
            q_values: ArrayD::zeros(IxDyn(&shape)),
            action_counts: Array1::zeros(config.n_arms),
            train: false,
            rng: Rng::with_seed(config.seed),
            phantom: PhantomData,
        }
    }
}

impl<E> Policy<E> for ContextualBandit<E>
where
    E: Env,
    E::Obs: Into<Vec<usize>>,
    E::Act: From<usize>,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let context: Vec<usize> = obs.clone().into();
        let a = if self.train {
            self.select_action(&context)
        } else {
            self.argmax_first(&context)
        };
        a.into()
    }
}

impl<E> Agent<E> for ContextualBandit<E>
where
    E: Env,
    E::Obs: Into<Vec<usize>>,
    E::Act: From<usize> + Into<usize>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    /// Updates the value of the selected arm with the received reward.
    ///
    /// The observation of the transition is the context; the next
    /// observation is ignored, as a bandit has no notion of state
    /// transitions.
    fn opt(&mut self, transition: &Transition<E>) -> Option<Record> {
        if !self.train {
            return None;
        }

        let context: Vec<usize> = transition.obs.clone().into();
        let a: usize = transition.act.clone().into();
        self.update(a, &context, transition.reward);

        Some(Record::from_slice(&[(
            "arm_value",
            RecordValue::Scalar(self.value(a, &context)),
        )]))
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        info!("Save bandit tables to {:?}", path.as_ref());
        fs::create_dir_all(&path)?;
        let params = ContextualBanditParams {
            shape: self.q_values.shape().to_vec(),
            q_values: self.q_values.iter().cloned().collect(),
            action_counts: self.action_counts.to_vec(),
        };
        let file = fs::File::create(path.as_ref().join("bandit.yaml"))?;
        serde_yaml::to_writer(file, &params)?;
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        info!("Load bandit tables from {:?}", path.as_ref());
        let file = fs::File::open(path.as_ref().join("bandit.yaml"))?;
        let params: ContextualBanditParams = serde_yaml::from_reader(file)?;
        self.q_values = ArrayD::from_shape_vec(IxDyn(&params.shape), params.q_values)?;
        self.action_counts = Array1::from_vec(params.action_counts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokegym_battle_env::BattleEnv;
    use tempdir::TempDir;

    fn bandit(epsilon: f64) -> ContextualBandit<BattleEnv> {
        let config = ContextualBanditConfig::default()
            .n_arms(3)
            .context_dims(vec![3])
            .epsilon(epsilon);
        ContextualBandit::build(config)
    }

    #[test]
    fn test_incremental_mean_update() {
        let mut b = bandit(0.0);

        b.update(1, &[2], 4.0);
        assert_eq!(b.value(1, &[2]), 4.0);
        assert_eq!(b.action_count(1), 1.0);

        b.update(1, &[2], 0.0);
        assert_eq!(b.value(1, &[2]), 2.0);
        assert_eq!(b.action_count(1), 2.0);
    }

    #[test]
    fn test_counts_are_per_arm_not_per_context() {
        let mut b = bandit(0.0);
        b.update(0, &[0], 1.0);
        b.update(0, &[1], 3.0);
        // the second update uses count 2 even though the context differs
        assert_eq!(b.action_count(0), 2.0);
        assert_eq!(b.value(0, &[0]), 1.0);
        assert_eq!(b.value(0, &[1]), 1.5);
    }

    #[test]
    fn test_greedy_ties_break_to_first_maximum() {
        let mut b = bandit(0.0);
        // all arms tied at zero: the first arm always wins
        for _ in 0..100 {
            assert_eq!(b.select_action(&[0]), 0);
        }
        b.update(2, &[0], 5.0);
        assert_eq!(b.select_action(&[0]), 2);
    }

    #[test]
    fn test_epsilon_one_is_uniform() {
        let mut b = bandit(1.0);
        let mut counts = [0usize; 3];
        let n = 30_000;
        for _ in 0..n {
            counts[b.select_action(&[1])] += 1;
        }
        for c in counts.iter() {
            assert!(*c > 9_000 && *c < 11_000, "counts = {:?}", counts);
        }
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let mut b = bandit(0.0);
        b.update(1, &[0], 6.0);

        let dir = TempDir::new("bandit")?;
        Agent::<BattleEnv>::save(&b, dir.path())?;

        let mut b_ = bandit(0.0);
        Agent::<BattleEnv>::load(&mut b_, dir.path())?;
        assert_eq!(b_.value(1, &[0]), 6.0);
        assert_eq!(b_.action_count(1), 1.0);
        Ok(())
    }
}
