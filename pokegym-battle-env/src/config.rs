//! Configuration of [`BattleEnv`](crate::BattleEnv).
use crate::PokemonConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// The three variants of the battle environment.
///
/// The variants share the battle mechanic and differ in observation schema
/// and in the same-type damage bonus (v0 has none).
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Variant {
    /// Observes the opponent's type only; no same-type damage bonus.
    V0,

    /// Observes both types.
    V1,

    /// Observes both types and the tail of the agent's moveset.
    V2,
}

impl Variant {
    /// The environment identifier this variant is registered under.
    pub fn env_id(&self) -> &'static str {
        match self {
            Variant::V0 => "PokemonBattleEnv-v0",
            Variant::V1 => "PokemonBattleEnv-v1",
            Variant::V2 => "PokemonBattleEnv-v2",
        }
    }

    /// Resolves an environment identifier to a variant.
    pub fn from_env_id(id: &str) -> Option<Self> {
        match id {
            "PokemonBattleEnv-v0" => Some(Variant::V0),
            "PokemonBattleEnv-v1" => Some(Variant::V1),
            "PokemonBattleEnv-v2" => Some(Variant::V2),
            _ => None,
        }
    }
}

/// How the opponent chooses its move.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum OpponentMode {
    /// Always a random move.
    Random,

    /// The most effective move with probability 0.5, a random move otherwise.
    RandomPerfect,
}

impl OpponentMode {
    /// Probability that the opponent picks the most effective move.
    pub fn perfect_move_prob(&self) -> f64 {
        match self {
            OpponentMode::Random => 0.0,
            OpponentMode::RandomPerfect => 0.5,
        }
    }
}

fn default_effectiveness() -> Vec<Vec<f32>> {
    // row: move type, column: defender type (fire, water, grass)
    vec![
        vec![1.0, 0.0, 2.0],
        vec![2.0, 1.0, 0.0],
        vec![0.0, 2.0, 1.0],
    ]
}

/// Configuration of [`BattleEnv`](crate::BattleEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BattleEnvConfig {
    /// Which variant of the environment to build.
    pub variant: Variant,

    /// The agent-controlled pokemon.
    pub pokemon1: PokemonConfig,

    /// The opponent-controlled pokemon.
    pub pokemon2: PokemonConfig,

    /// Type-effectiveness chart, indexed `[move_type][defender_type]`.
    ///
    /// Values are opaque multipliers flowing into the damage arithmetic,
    /// conventionally 0 (immune), 1 (neutral) or 2 (super effective).
    pub effectiveness: Vec<Vec<f32>>,

    /// How the opponent chooses its move.
    pub opponent: OpponentMode,

    /// Whether a shaping reward is granted on non-terminal steps.
    pub additional_reward: bool,

    /// Whether same-type moves deal extra damage (v1/v2 only).
    pub selftype_dmg: bool,
}

impl Default for BattleEnvConfig {
    fn default() -> Self {
        Self {
            variant: Variant::V0,
            pokemon1: PokemonConfig::default(),
            pokemon2: PokemonConfig::default(),
            effectiveness: default_effectiveness(),
            opponent: OpponentMode::Random,
            additional_reward: true,
            selftype_dmg: true,
        }
    }
}

impl BattleEnvConfig {
    /// Creates the default configuration of the variant registered under
    /// the given environment identifier.
    pub fn from_env_id(id: &str) -> Option<Self> {
        Variant::from_env_id(id).map(|v| Self::default().variant(v))
    }

    /// Sets the variant.
    pub fn variant(mut self, v: Variant) -> Self {
        self.variant = v;
        self
    }

    /// Sets the agent-controlled pokemon.
    pub fn pokemon1(mut self, v: PokemonConfig) -> Self {
        self.pokemon1 = v;
        self
    }

    /// Sets the opponent-controlled pokemon.
    pub fn pokemon2(mut self, v: PokemonConfig) -> Self {
        self.pokemon2 = v;
        self
    }

    /// Sets the type-effectiveness chart.
    pub fn effectiveness(mut self, v: Vec<Vec<f32>>) -> Self {
        self.effectiveness = v;
        self
    }

    /// Sets the opponent mode.
    pub fn opponent(mut self, v: OpponentMode) -> Self {
        self.opponent = v;
        self
    }

    /// Sets whether a shaping reward is granted on non-terminal steps.
    pub fn additional_reward(mut self, v: bool) -> Self {
        self.additional_reward = v;
        self
    }

    /// Sets whether same-type moves deal extra damage.
    pub fn selftype_dmg(mut self, v: bool) -> Self {
        self.selftype_dmg = v;
        self
    }

    /// Constructs [`BattleEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BattleEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_env_id_roundtrip() {
        for v in [Variant::V0, Variant::V1, Variant::V2].iter() {
            assert_eq!(Variant::from_env_id(v.env_id()), Some(*v));
        }
        assert_eq!(Variant::from_env_id("CartPole-v0"), None);
    }

    #[test]
    fn test_serde_battle_env_config() -> Result<()> {
        let config = BattleEnvConfig::from_env_id("PokemonBattleEnv-v1")
            .unwrap()
            .opponent(OpponentMode::RandomPerfect)
            .selftype_dmg(false);

        let dir = TempDir::new("battle_env_config")?;
        let path = dir.path().join("battle_env_config.yaml");

        config.save(&path)?;
        let config_ = BattleEnvConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
