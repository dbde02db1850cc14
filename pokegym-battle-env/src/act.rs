//! Action of [`BattleEnv`](crate::BattleEnv).
use pokegym_core::Act;

/// Action of [`BattleEnv`](crate::BattleEnv).
///
/// The action is an index into the agent's moveset, not a type index.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleAct {
    /// Index of the selected move in the moveset.
    pub ix: usize,
}

impl BattleAct {
    /// Creates an action selecting the move at the given moveset index.
    pub fn new(ix: usize) -> Self {
        Self { ix }
    }
}

impl From<usize> for BattleAct {
    fn from(ix: usize) -> Self {
        Self { ix }
    }
}

impl From<BattleAct> for usize {
    fn from(act: BattleAct) -> Self {
        act.ix
    }
}

impl Act for BattleAct {
    fn len(&self) -> usize {
        1
    }
}
