//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
/// This object might be used to create transitions `(o_t, a_t, o_t+1, r_t)`.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: Vec<f32>,

    /// Flag denoting if episode is terminated.
    pub is_terminated: Vec<i8>,

    /// Flag denoting if episode is truncated.
    pub is_truncated: Vec<i8>,

    /// Information defined by user.
    pub info: E::Info,

    /// Initial observation. If `is_done[i] == 0`, the corresponding element
    /// will not be used.
    pub init_obs: E::Obs,
}

impl<E: Env> std::fmt::Debug for Step<E>
where
    E::Act: std::fmt::Debug,
    E::Obs: std::fmt::Debug,
    E::Info: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("act", &self.act)
            .field("obs", &self.obs)
            .field("reward", &self.reward)
            .field("is_terminated", &self.is_terminated)
            .field("is_truncated", &self.is_truncated)
            .field("info", &self.info)
            .field("init_obs", &self.init_obs)
            .finish()
    }
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        is_terminated: Vec<i8>,
        is_truncated: Vec<i8>,
        info: E::Info,
        init_obs: E::Obs,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
            init_obs,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated[0] == 1 || self.is_truncated[0] == 1
    }
}

/// A single transition `(o_t, a_t, r_t, o_t+1)` for online updates.
///
/// The library has no replay buffer; the [`Trainer`](crate::Trainer)
/// creates a [`Transition`] from each [`Step`] and hands it to the agent
/// immediately.
pub struct Transition<E: Env> {
    /// Observation at the current step.
    pub obs: E::Obs,

    /// Action taken at the current step.
    pub act: E::Act,

    /// Reward received for the action.
    pub reward: f32,

    /// Observation at the next step.
    pub next_obs: E::Obs,

    /// If the episode terminated at this transition.
    pub is_terminated: bool,
}

impl<E: Env> Transition<E> {
    /// Creates a transition from a step and the preceding observation.
    ///
    /// Environments in this library report the cumulative episode reward
    /// in [`Step::reward`]; `prev_reward_total` is the cumulative reward
    /// before this step, so the transition carries the per-step reward
    /// `step.reward[0] - prev_reward_total`. Termination flags are taken
    /// from `step`, assuming a non-vectorized environment.
    pub fn from_step(obs: E::Obs, step: &Step<E>, prev_reward_total: f32) -> Self
    where
        E::Obs: Clone,
        E::Act: Clone,
    {
        Self {
            obs,
            act: step.act.clone(),
            reward: step.reward[0] - prev_reward_total,
            next_obs: step.obs.clone(),
            is_terminated: step.is_terminated[0] == 1,
        }
    }
}
