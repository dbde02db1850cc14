//! Tabular Q-learning agent.
use super::{config::QLearningConfig, explorer::EpsilonGreedy};
use anyhow::Result;
use fastrand::Rng;
use log::info;
use ndarray::{ArrayD, Axis, IxDyn};
use pokegym_core::{
    record::{Record, RecordValue},
    Agent, Configurable, Env, Policy, Transition,
};
use serde::{Deserialize, Serialize};
use std::{fs, marker::PhantomData, path::Path};

/// On-disk representation of the value table.
#[derive(Debug, Deserialize, Serialize)]
struct QLearningParams {
    shape: Vec<usize>,
    data: Vec<f32>,
}

/// Off-policy one-step temporal difference control (Q-learning).
///
/// The agent evaluates Q-values for `(S, A)` pairs in a dense table of
/// shape `(*space_size, n_actions)`, initialized to zero. States and
/// actions are arbitrary discrete tuples/indices supplied by the caller;
/// the update always bootstraps off the greedy maximum over the next
/// state's action values, regardless of the behavior policy.
pub struct QLearning<E> {
    space_size: Vec<usize>,
    n_actions: usize,
    gamma: f32,
    lr: f32,
    qvalues: ArrayD<f32>,
    explorer: EpsilonGreedy,
    train: bool,
    rng: Rng,
    phantom: PhantomData<E>,
}

impl<E> QLearning<E> {
    /// Cardinality of each state dimension.
    pub fn space_size(&self) -> &[usize] {
        &self.space_size
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn index(s: &[usize], a: usize) -> IxDyn {
        let mut ix = s.to_vec();
        ix.push(a);
        IxDyn(&ix)
    }

    /// The Q-value of a state-action pair.
    pub fn q(&self, s: &[usize], a: usize) -> f32 {
        self.qvalues[Self::index(s, a)]
    }

    fn max_q(&self, s: &[usize]) -> f32 {
        (0..self.n_actions)
            .map(|a| self.q(s, a))
            .fold(f32::MIN, f32::max)
    }

    fn argmax_first(&self, s: &[usize]) -> usize {
        let mut best = 0;
        for a in 1..self.n_actions {
            if self.q(s, a) > self.q(s, best) {
                best = a;
            }
        }
        best
    }

    /// Uses a single step to update the values.
    ///
    /// The temporal difference target uses the best evaluated action in
    /// the new state, `max_a Q(S_new, a)`, or the bare reward on terminal
    /// transitions. Returns the temporal difference error before the
    /// learning-rate scaling; the applied change is `lr` times it.
    pub fn single_step_update(
        &mut self,
        s: &[usize],
        a: usize,
        r: f32,
        new_s: &[usize],
        done: bool,
    ) -> f32 {
        let target = if done {
            r
        } else {
            r + self.gamma * self.max_q(new_s)
        };

        let ix = Self::index(s, a);
        let delta_q = target - self.qvalues[&ix];
        self.qvalues[&ix] += self.lr * delta_q;
        delta_q
    }

    /// Chooses an action with an epsilon-greedy policy wrt the current
    /// Q-values.
    ///
    /// With probability `eps` the action is uniform over all actions;
    /// otherwise it is uniform among all actions tied for the maximum
    /// Q-value at `s`.
    pub fn select_action_epsilon_greedy(&mut self, s: &[usize], eps: f64) -> usize {
        if self.rng.f64() < eps {
            self.rng.usize(0..self.n_actions)
        } else {
            let best_value = self.max_q(s);
            let best_actions: Vec<usize> = (0..self.n_actions)
                .filter(|a| self.q(s, *a) == best_value)
                .collect();
            best_actions[self.rng.usize(0..best_actions.len())]
        }
    }

    /// The greedy policy over all states: the per-state action index of
    /// the maximum Q-value (first occurrence).
    pub fn greedy_policy(&self) -> ArrayD<usize> {
        let last = Axis(self.qvalues.ndim() - 1);
        self.qvalues.map_axis(last, |row| {
            let mut best = 0;
            for (a, v) in row.iter().enumerate() {
                if *v > row[best] {
                    best = a;
                }
            }
            best
        })
    }
}

impl<E> Configurable for QLearning<E> {
    type Config = QLearningConfig;

    fn build(config: Self::Config) -> Self {
        let mut shape = config.space_size.clone();
        shape.push(config.n_actions);

        Self {
            space_size: config.space_size,
            n_actions: config.n_actions,
            gamma: config.gamma,
            lr: config.lr,
            qvalues: ArrayD::zeros(IxDyn(&shape)),
            explorer: config.explorer,
            train: false,
            rng: Rng::with_seed(config.seed),
            phantom: PhantomData,
        }
    }
}

impl<E> Policy<E> for QLearning<E>
where
    E: Env,
    E::Obs: Into<Vec<usize>>,
    E::Act: From<usize>,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let s: Vec<usize> = obs.clone().into();
        let a = if self.train {
            let eps = self.explorer.eps();
            self.select_action_epsilon_greedy(&s, eps)
        } else {
            self.argmax_first(&s)
        };
        a.into()
    }
}

impl<E> Agent<E> for QLearning<E>
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

    fn opt(&mut self, transition: &Transition<E>) -> Option<Record> {
        if !self.train {
            return None;
        }

        let s: Vec<usize> = transition.obs.clone().into();
        let new_s: Vec<usize> = transition.next_obs.clone().into();
        let a: usize = transition.act.clone().into();
        let delta_q =
            self.single_step_update(&s, a, transition.reward, &new_s, transition.is_terminated);

        Some(Record::from_slice(&[(
            "td_err",
            RecordValue::Scalar(delta_q),
        )]))
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        info!("Save Q-value table to {:?}", path.as_ref());
        fs::create_dir_all(&path)?;
        let params = QLearningParams {
            shape: self.qvalues.shape().to_vec(),
            data: self.qvalues.iter().cloned().collect(),
        };
        let file = fs::File::create(path.as_ref().join("qvalues.yaml"))?;
        serde_yaml::to_writer(file, &params)?;
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        info!("Load Q-value table from {:?}", path.as_ref());
        let file = fs::File::open(path.as_ref().join("qvalues.yaml"))?;
        let params: QLearningParams = serde_yaml::from_reader(file)?;
        self.qvalues = ArrayD::from_shape_vec(IxDyn(&params.shape), params.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokegym_battle_env::BattleEnv;
    use tempdir::TempDir;

    fn agent(lr: f32) -> QLearning<BattleEnv> {
        let config = QLearningConfig::default()
            .space_size(vec![3, 3])
            .n_actions(3)
            .gamma(1.0)
            .lr(lr);
        QLearning::build(config)
    }

    #[test]
    fn test_single_step_update() {
        let mut q = agent(0.5);

        // With all values at zero the target is the bare reward.
        q.single_step_update(&[0, 1], 2, 10.0, &[1, 1], false);
        assert_eq!(q.q(&[0, 1], 2), 5.0);

        // Terminal transitions do not bootstrap.
        q.single_step_update(&[1, 1], 0, 4.0, &[0, 1], true);
        assert_eq!(q.q(&[1, 1], 0), 2.0);

        // Non-terminal transitions bootstrap off the greedy maximum of
        // the next state, here Q([0, 1], 2) = 5.
        q.single_step_update(&[2, 2], 1, 0.0, &[0, 1], false);
        assert_eq!(q.q(&[2, 2], 1), 2.5);
    }

    #[test]
    fn test_epsilon_one_is_uniform() {
        let mut q = agent(0.01);
        let mut counts = [0usize; 3];
        let n = 30_000;
        for _ in 0..n {
            counts[q.select_action_epsilon_greedy(&[0, 0], 1.0)] += 1;
        }
        for c in counts.iter() {
            // loose 3-sigma style bound around n / 3
            assert!(*c > 9_000 && *c < 11_000, "counts = {:?}", counts);
        }
    }

    #[test]
    fn test_greedy_selection_is_uniform_among_ties() {
        let mut q = agent(0.5);
        // actions 0 and 2 are tied for the maximum
        q.single_step_update(&[0, 0], 0, 2.0, &[1, 1], true);
        q.single_step_update(&[0, 0], 2, 2.0, &[1, 1], true);

        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            counts[q.select_action_epsilon_greedy(&[0, 0], 0.0)] += 1;
        }
        assert_eq!(counts[1], 0);
        assert!(counts[0] > 4_000 && counts[2] > 4_000, "counts = {:?}", counts);
    }

    #[test]
    fn test_greedy_policy_takes_first_maximum() {
        let mut q = agent(1.0);
        q.single_step_update(&[1, 0], 1, 3.0, &[0, 0], true);
        let greedy = q.greedy_policy();
        assert_eq!(greedy.shape(), &[3, 3]);
        // untouched states default to the first action
        assert_eq!(greedy[IxDyn(&[0, 0])], 0);
        assert_eq!(greedy[IxDyn(&[1, 0])], 1);
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let mut q = agent(0.5);
        q.single_step_update(&[2, 1], 0, 8.0, &[0, 0], true);

        let dir = TempDir::new("qlearning")?;
        Agent::<BattleEnv>::save(&q, dir.path())?;

        let mut q_ = agent(0.5);
        Agent::<BattleEnv>::load(&mut q_, dir.path())?;
        assert_eq!(q_.q(&[2, 1], 0), 4.0);
        Ok(())
    }
}
