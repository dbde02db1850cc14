//! Observation of [`BattleEnv`](crate::BattleEnv).
use pokegym_core::Obs;

/// Observation of [`BattleEnv`](crate::BattleEnv).
///
/// The content depends on the variant of the environment:
///
/// * v0 - `[opponent_type]`
/// * v1 - `[agent_type, opponent_type]`
/// * v2 - `[agent_type, opponent_type, moveset[1], .., moveset[n-1]]`
///
/// All entries are indices into the type catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleObs(Vec<usize>);

impl BattleObs {
    /// The observed type indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for BattleObs {
    fn from(values: Vec<usize>) -> Self {
        Self(values)
    }
}

impl From<BattleObs> for Vec<usize> {
    fn from(obs: BattleObs) -> Self {
        obs.0
    }
}

impl Obs for BattleObs {
    fn dummy(_n: usize) -> Self {
        Self(vec![])
    }

    fn len(&self) -> usize {
        1
    }
}
