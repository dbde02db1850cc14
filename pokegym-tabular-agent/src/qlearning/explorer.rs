//! Exploration schedule of the Q-learning agent.
use serde::{Deserialize, Serialize};

/// Epsilon-greedy exploration with a linearly annealed epsilon.
///
/// The epsilon value decreases linearly from `eps_start` to `eps_final`
/// over `final_step` calls.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// The number of calls so far.
    pub n_opts: usize,

    /// Epsilon at the first call.
    pub eps_start: f64,

    /// Epsilon after `final_step` calls.
    pub eps_final: f64,

    /// The number of calls over which epsilon is annealed.
    pub final_step: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            n_opts: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs an epsilon-greedy explorer annealing over the given
    /// number of calls.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            final_step,
            ..Default::default()
        }
    }

    /// Returns the current epsilon and advances the schedule.
    pub fn eps(&mut self) -> f64 {
        let d = (self.eps_start - self.eps_final) / (self.final_step as f64);
        let eps = (self.eps_start - d * self.n_opts as f64).max(self.eps_final);
        self.n_opts += 1;
        eps
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(self, v: f64) -> Self {
        let mut s = self;
        s.eps_final = v;
        s
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(self, v: f64) -> Self {
        let mut s = self;
        s.eps_start = v;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::EpsilonGreedy;

    #[test]
    fn test_annealing() {
        let mut explorer = EpsilonGreedy::with_final_step(10).eps_final(0.0);
        assert_eq!(explorer.eps(), 1.0);
        for _ in 0..20 {
            explorer.eps();
        }
        assert_eq!(explorer.eps(), 0.0);
    }
}
