//! The battle environment.
use crate::{BattleAct, BattleEnvConfig, BattleObs, Pokemon, Variant};
use anyhow::{ensure, Result};
use fastrand::Rng;
use log::info;
use ndarray::Array2;
use pokegym_core::{
    record::{Record, RecordValue},
    Env, Info, Obs, PokegymError, Step,
};

/// Auxiliary per-step information of [`BattleEnv`].
#[derive(Debug, Clone)]
pub struct BattleInfo {
    /// The type of the move the agent attacked with.
    pub agent_move: usize,

    /// The type of the move the opponent attacked with, or `None` if the
    /// opponent fainted before it could counter-attack.
    pub opponent_move: Option<usize>,
}

impl Info for BattleInfo {}

/// Which side of the battle is attacking.
#[derive(Clone, Copy)]
enum Side {
    Agent,
    Opponent,
}

/// A one-on-one turn-based battle between two typed pokemon.
///
/// The agent controls `pokemon1`. On every step the agent attacks first;
/// if the opponent survives the attack it counter-attacks, otherwise its
/// action is recorded as fainted. The episode terminates as soon as either
/// side has fainted, checked once after the full turn.
///
/// The reward reported at each step is the cumulative episode reward: an
/// optional per-step shaping term for move quality plus, on the terminal
/// step, the agent's own remaining health. An agent that faints in the
/// same turn as its opponent therefore gets no terminal bonus.
pub struct BattleEnv {
    /// Agent-controlled pokemon.
    pokemon1: Pokemon,

    /// Opponent-controlled pokemon.
    pokemon2: Pokemon,

    /// Type-effectiveness chart, indexed `[move_type, defender_type]`.
    effectiveness: Array2<f32>,

    variant: Variant,

    /// Probability that the opponent picks the most effective move.
    perfect_opponent_prob: f64,

    additional_reward: bool,
    selftype_dmg: bool,

    /// Cumulative reward of the running episode.
    reward: f64,

    /// If the running episode has terminated.
    done: bool,

    rng: Rng,
}

impl BattleEnv {
    /// Damage of attacking with the given move type against the given
    /// defender type, truncated to an integer.
    ///
    /// Variants v1/v2 add a flat +5 when the move type equals the
    /// attacker's own type and the same-type damage option is on; v0 has
    /// no such bonus.
    fn calculate_damage(
        &self,
        move_type: usize,
        attacker_type: usize,
        defender_type: usize,
    ) -> i64 {
        let mut damage = 10.0 * self.effectiveness[[move_type, defender_type]];
        if self.variant != Variant::V0 && self.selftype_dmg && move_type == attacker_type {
            damage += 5.0;
        }
        damage as i64
    }

    fn attack(&mut self, move_type: usize, side: Side) {
        let (attacker_type, defender_type) = match side {
            Side::Agent => (self.pokemon1.type_ix(), self.pokemon2.type_ix()),
            Side::Opponent => (self.pokemon2.type_ix(), self.pokemon1.type_ix()),
        };
        let damage = self.calculate_damage(move_type, attacker_type, defender_type);
        match side {
            Side::Agent => self.pokemon2.apply_damage(damage),
            Side::Opponent => self.pokemon1.apply_damage(damage),
        }
    }

    /// Chooses the opponent's move as a type index.
    ///
    /// With the perfect-move probability the opponent greedily picks the
    /// type with the highest effectiveness against the agent's current
    /// type, over the full type catalog. Otherwise it draws uniformly from
    /// its moveset length (v0) or from the hardcoded 4-slot range (v1/v2).
    /// The drawn value is used directly as a type index, not resolved
    /// through the opponent's moveset. Both quirks are inherited behavior
    /// and are kept as is.
    fn opponent_move(&mut self) -> usize {
        if self.rng.f64() < self.perfect_opponent_prob {
            let col = self.effectiveness.column(self.pokemon1.type_ix());
            let mut best = 0;
            for (i, v) in col.iter().enumerate() {
                if *v > col[best] {
                    best = i;
                }
            }
            best
        } else {
            match self.variant {
                Variant::V0 => self.rng.usize(0..self.pokemon2.moveset().len()),
                _ => self.rng.usize(0..4),
            }
        }
    }

    /// Shaping reward for the quality of the chosen move type.
    fn partial_reward(&self, move_type: usize) -> f64 {
        let eff = self.effectiveness[[move_type, self.pokemon2.type_ix()]];
        let mut reward = if eff == 2.0 {
            1.0
        } else if eff == 1.0 {
            0.0
        } else {
            -1.0
        };

        if self.variant != Variant::V0 && self.selftype_dmg && move_type == self.pokemon1.type_ix()
        {
            reward += 0.5;
        }

        reward
    }

    fn battle_over(&self) -> bool {
        self.pokemon1.is_fainted() || self.pokemon2.is_fainted()
    }

    fn observation(&self) -> BattleObs {
        let values = match self.variant {
            Variant::V0 => vec![self.pokemon2.type_ix()],
            Variant::V1 => vec![self.pokemon1.type_ix(), self.pokemon2.type_ix()],
            Variant::V2 => {
                let mut v = vec![self.pokemon1.type_ix(), self.pokemon2.type_ix()];
                v.extend_from_slice(&self.pokemon1.moveset()[1..]);
                v
            }
        };
        values.into()
    }

    /// A rendering of the current battle state.
    pub fn render(&self) -> String {
        format!("{} vs {}", self.pokemon1, self.pokemon2)
    }

    /// The agent-controlled pokemon.
    pub fn pokemon1(&self) -> &Pokemon {
        &self.pokemon1
    }

    /// The opponent-controlled pokemon.
    pub fn pokemon2(&self) -> &Pokemon {
        &self.pokemon2
    }

    fn move_name(&self, move_type: usize) -> String {
        self.pokemon1
            .types_map()
            .get(move_type)
            .cloned()
            .unwrap_or_else(|| format!("{}", move_type))
    }
}

impl Env for BattleEnv {
    type Config = BattleEnvConfig;
    type Obs = BattleObs;
    type Act = BattleAct;
    type Info = BattleInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let n_rows = config.effectiveness.len();
        let n_cols = config.effectiveness.get(0).map(|r| r.len()).unwrap_or(0);
        ensure!(
            config.effectiveness.iter().all(|r| r.len() == n_cols),
            "effectiveness chart rows must have equal length"
        );
        let flat: Vec<f32> = config.effectiveness.iter().flatten().cloned().collect();
        let effectiveness = Array2::from_shape_vec((n_rows, n_cols), flat)?;

        info!(
            "Build {} with a {}x{} effectiveness chart",
            config.variant.env_id(),
            n_rows,
            n_cols
        );
        let mut rng = Rng::with_seed(seed as u64);
        let mut pokemon1 = Pokemon::build(&config.pokemon1);
        let mut pokemon2 = Pokemon::build(&config.pokemon2);
        pokemon1.randomize(&mut rng);
        pokemon2.randomize(&mut rng);

        Ok(Self {
            pokemon1,
            pokemon2,
            effectiveness,
            variant: config.variant,
            perfect_opponent_prob: config.opponent.perfect_move_prob(),
            additional_reward: config.additional_reward,
            selftype_dmg: config.selftype_dmg,
            reward: 0.0,
            done: false,
            rng,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let n_acts = self.pokemon1.moveset().len();
        if a.ix >= n_acts {
            return Err(PokegymError::InvalidAction { act: a.ix, n_acts }.into());
        }
        let agent_move = self.pokemon1.moveset()[a.ix];

        // Agent attacks first.
        self.attack(agent_move, Side::Agent);

        // The opponent counter-attacks unless it fainted.
        let opponent_move = if !self.pokemon2.is_fainted() {
            let mv = self.opponent_move();
            self.attack(mv, Side::Opponent);
            Some(mv)
        } else {
            None
        };

        // The termination check happens after the full turn, which decides
        // who gets the last hit.
        if self.battle_over() {
            self.done = true;
            self.reward += self.pokemon1.health() as f64;
        } else if self.additional_reward {
            self.reward += self.partial_reward(agent_move);
        }

        let mut record = Record::empty();
        record.insert(
            "agent_move",
            RecordValue::String(self.move_name(agent_move)),
        );
        record.insert(
            "opponent_move",
            RecordValue::String(match opponent_move {
                Some(mv) => self.move_name(mv),
                None => "fainted".to_string(),
            }),
        );

        let step = Step::new(
            self.observation(),
            a.clone(),
            vec![self.reward as f32],
            vec![self.done as i8],
            vec![0],
            BattleInfo {
                agent_move,
                opponent_move,
            },
            BattleObs::dummy(1),
        );

        Ok((step, record))
    }

    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
        match is_done {
            None => {}
            Some(v) => {
                debug_assert_eq!(v.len(), 1);
                if v[0] == 0 {
                    return Ok(self.observation());
                }
            }
        }

        self.pokemon1.reset(&mut self.rng);
        self.pokemon2.reset(&mut self.rng);
        self.reward = 0.0;
        self.done = false;
        Ok(self.observation())
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (step, record) = self.step(a)?;
        let step = if step.is_done() {
            let init_obs = self.reset(None)?;
            Step {
                init_obs,
                ..step
            }
        } else {
            step
        };
        Ok((step, record))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = Rng::with_seed(ix as u64);
        self.reset(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpponentMode;

    fn build(variant: Variant) -> BattleEnv {
        let config = BattleEnvConfig::default()
            .variant(variant)
            .opponent(OpponentMode::Random);
        BattleEnv::build(&config, 42).unwrap()
    }

    // The v1/v2 opponent draws its random move from the hardcoded 0..4
    // range, so counter-attacks need a chart with at least 4 rows.
    fn four_type_config(variant: Variant) -> BattleEnvConfig {
        let types: Vec<String> = ["fire", "water", "grass", "electric"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pkm = crate::PokemonConfig::default().types_map(types);
        BattleEnvConfig::default()
            .variant(variant)
            .pokemon1(pkm.clone())
            .pokemon2(pkm)
            .effectiveness(vec![
                vec![1.0, 0.0, 2.0, 1.0],
                vec![2.0, 1.0, 0.0, 1.0],
                vec![0.0, 2.0, 1.0, 1.0],
                vec![1.0, 2.0, 1.0, 0.0],
            ])
    }

    // Agent is fire, opponent is grass; fire is super effective.
    fn fix_matchup(env: &mut BattleEnv) {
        env.pokemon1.type_ix = 0;
        env.pokemon2.type_ix = 2;
        env.pokemon1.moveset = vec![0, 1, 2];
        env.pokemon2.moveset = vec![0, 1, 2];
        env.pokemon1.health = 100;
        env.pokemon2.health = 100;
        env.reward = 0.0;
        env.done = false;
    }

    #[test]
    fn test_damage_without_selftype_bonus() {
        let env = build(Variant::V0);
        // super effective, 10 * 2, no bonus in v0 even for same-type moves
        assert_eq!(env.calculate_damage(0, 0, 2), 20);
        // neutral
        assert_eq!(env.calculate_damage(0, 0, 0), 10);
        // immune
        assert_eq!(env.calculate_damage(0, 0, 1), 0);
    }

    #[test]
    fn test_damage_with_selftype_bonus() {
        let env = build(Variant::V1);
        // super effective same-type move
        assert_eq!(env.calculate_damage(0, 0, 2), 25);
        // super effective, different type
        assert_eq!(env.calculate_damage(0, 1, 2), 20);
    }

    #[test]
    fn test_invalid_action() {
        let mut env = build(Variant::V0);
        let err = env.step(&BattleAct::new(3)).unwrap_err();
        let err = err.downcast::<PokegymError>().unwrap();
        assert!(matches!(
            err,
            PokegymError::InvalidAction { act: 3, n_acts: 3 }
        ));
    }

    #[test]
    fn test_shaping_reward_v1() {
        let mut env = BattleEnv::build(&four_type_config(Variant::V1), 42).unwrap();
        fix_matchup(&mut env);

        // fire move from a fire pokemon against grass: 10 * 2 + 5 damage,
        // +1 shaping for super effective, +0.5 for the same-type move
        let (step, _) = env.step(&BattleAct::new(0)).unwrap();
        assert_eq!(env.pokemon2.health(), 75);
        assert_eq!(step.reward[0], 1.5);
        assert!(!step.is_done());
        assert_eq!(step.info.agent_move, 0);
        assert!(step.info.opponent_move.is_some());
    }

    #[test]
    fn test_no_shaping_reward_when_disabled() {
        let config = four_type_config(Variant::V1).additional_reward(false);
        let mut env = BattleEnv::build(&config, 42).unwrap();
        fix_matchup(&mut env);
        // enough health to survive any counter-attack
        env.pokemon1.health = 1000;
        env.pokemon1.max_health = 1000;

        let (step, _) = env.step(&BattleAct::new(0)).unwrap();
        assert!(!step.is_done());
        assert_eq!(step.reward[0], 0.0);
    }

    #[test]
    fn test_terminal_reward_is_agent_health() {
        let mut env = build(Variant::V1);
        fix_matchup(&mut env);
        env.pokemon2.health = 5;

        let (step, record) = env.step(&BattleAct::new(0)).unwrap();
        // the opponent fainted before counter-attacking
        assert!(step.is_done());
        assert_eq!(env.pokemon2.health(), 0);
        assert_eq!(step.info.opponent_move, None);
        assert_eq!(record.get_string("opponent_move").unwrap(), "fainted");
        // terminal bonus is the agent's own remaining health
        assert_eq!(step.reward[0], 100.0);
    }

    #[test]
    fn test_fainted_agent_gets_no_terminal_bonus() {
        // every move is super effective, so any counter-attack knocks the
        // agent out while the opponent survives
        let config = four_type_config(Variant::V1).effectiveness(vec![vec![2.0; 4]; 4]);
        let mut env = BattleEnv::build(&config, 42).unwrap();
        fix_matchup(&mut env);
        env.pokemon1.health = 1;

        let (step, _) = env.step(&BattleAct::new(0)).unwrap();
        assert!(step.is_done());
        assert!(env.pokemon1.is_fainted());
        assert!(!env.pokemon2.is_fainted());
        assert_eq!(step.reward[0], 0.0);
    }

    #[test]
    fn test_observation_schema() {
        for (variant, len) in [(Variant::V0, 1), (Variant::V1, 2), (Variant::V2, 4)].iter() {
            let mut env = build(*variant);
            let obs = env.reset(None).unwrap();
            assert_eq!(obs.as_slice().len(), *len);
        }
    }

    #[test]
    fn test_health_clamped_and_termination_monotonic() {
        let mut env = build(Variant::V0);
        let mut obs = env.reset(None).unwrap();
        assert_eq!(obs.as_slice().len(), 1);

        for _ in 0..1000 {
            let act = BattleAct::new(env.rng.usize(0..3));
            let (step, _) = env.step(&act).unwrap();
            assert!(env.pokemon1.health() >= 0 && env.pokemon1.health() <= 100);
            assert!(env.pokemon2.health() >= 0 && env.pokemon2.health() <= 100);
            if step.is_done() {
                assert!(env.pokemon1.is_fainted() || env.pokemon2.is_fainted());
                obs = env.reset(None).unwrap();
                assert_eq!(obs.as_slice().len(), 1);
            }
        }
    }

    #[test]
    fn test_reset_with_index_is_reproducible() {
        let mut env1 = build(Variant::V2);
        let mut env2 = build(Variant::V2);
        for ix in 0..10 {
            let o1 = env1.reset_with_index(ix).unwrap();
            let o2 = env2.reset_with_index(ix).unwrap();
            assert_eq!(o1, o2);
        }
    }
}
