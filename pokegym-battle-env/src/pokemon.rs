//! A battle participant.
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_types_map() -> Vec<String> {
    vec!["fire".to_string(), "water".to_string(), "grass".to_string()]
}

/// Configuration of [`Pokemon`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PokemonConfig {
    /// Initial type, as an index into `types_map`.
    pub type_ix: usize,

    /// Maximum (and initial) health.
    pub health: i64,

    /// The ordered catalog of allowed type names.
    pub types_map: Vec<String>,
}

impl Default for PokemonConfig {
    fn default() -> Self {
        Self {
            type_ix: 0,
            health: 100,
            types_map: default_types_map(),
        }
    }
}

impl PokemonConfig {
    /// Sets the initial type index.
    pub fn type_ix(mut self, v: usize) -> Self {
        self.type_ix = v;
        self
    }

    /// Sets the maximum health.
    pub fn health(mut self, v: i64) -> Self {
        self.health = v;
        self
    }

    /// Sets the catalog of allowed types.
    pub fn types_map(mut self, v: Vec<String>) -> Self {
        self.types_map = v;
        self
    }
}

/// A typed battle participant with health and a moveset.
///
/// The moveset holds type indices, not move identities; attacking with a
/// move means attacking with its type.
#[derive(Debug, Clone)]
pub struct Pokemon {
    pub(crate) type_ix: usize,
    pub(crate) health: i64,
    pub(crate) max_health: i64,
    pub(crate) moveset: Vec<usize>,
    pub(crate) types_map: Vec<String>,
}

impl Pokemon {
    /// Builds a pokemon from its configuration.
    ///
    /// The moveset is empty until the first call to [`Pokemon::randomize`]
    /// or [`Pokemon::reset`].
    pub fn build(config: &PokemonConfig) -> Self {
        Self {
            type_ix: config.type_ix,
            health: config.health,
            max_health: config.health,
            moveset: Vec::new(),
            types_map: config.types_map.clone(),
        }
    }

    /// Redraws the type, restores health and regenerates the moveset.
    ///
    /// The type is drawn uniformly over the type catalog. With a catalog of
    /// exactly 3 or 4 types, the moveset gets one move per type, in catalog
    /// order. Otherwise the moveset gets 4 distinct random type indices,
    /// the first of which is the pokemon's own type. The asymmetry between
    /// the two branches is inherited behavior and is kept as is.
    pub fn randomize(&mut self, rng: &mut Rng) {
        let n_types = self.types_map.len();
        self.type_ix = rng.usize(0..n_types);
        self.health = self.max_health;

        if n_types == 3 || n_types == 4 {
            self.moveset = (0..n_types).collect();
        } else {
            self.moveset = vec![self.type_ix];
            while self.moveset.len() < 4 {
                let mv = rng.usize(0..n_types);
                if !self.moveset.contains(&mv) {
                    self.moveset.push(mv);
                }
            }
        }
    }

    /// Resets the pokemon for a new episode.
    pub fn reset(&mut self, rng: &mut Rng) {
        self.randomize(rng);
    }

    /// True iff the pokemon has no health left.
    pub fn is_fainted(&self) -> bool {
        self.health <= 0
    }

    /// Restores health to the maximum without changing type or moveset.
    pub fn restore(&mut self) {
        self.health = self.max_health;
    }

    /// Subtracts damage from health, clamping at zero.
    pub(crate) fn apply_damage(&mut self, damage: i64) {
        self.health -= damage;
        if self.health <= 0 {
            self.health = 0;
        }
    }

    /// The current type, as an index into the type catalog.
    pub fn type_ix(&self) -> usize {
        self.type_ix
    }

    /// The name of the current type.
    pub fn type_name(&self) -> &str {
        &self.types_map[self.type_ix]
    }

    /// Current health.
    pub fn health(&self) -> i64 {
        self.health
    }

    /// Maximum health.
    pub fn max_health(&self) -> i64 {
        self.max_health
    }

    /// The moveset, as type indices.
    pub fn moveset(&self) -> &[usize] {
        &self.moveset
    }

    /// The ordered catalog of type names.
    pub fn types_map(&self) -> &[String] {
        &self.types_map
    }
}

impl fmt::Display for Pokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves: Vec<&str> = self
            .moveset
            .iter()
            .map(|t| self.types_map[*t].as_str())
            .collect();
        write!(
            f,
            "{} ({}/{}) {:?}",
            self.type_name(),
            self.health,
            self.max_health,
            moves
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_types() -> Vec<String> {
        ["fire", "water", "grass", "electric", "rock", "ice"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_randomize_with_canonical_catalog() {
        let mut rng = Rng::with_seed(42);
        let mut pkm = Pokemon::build(&PokemonConfig::default());

        for _ in 0..100 {
            pkm.health = 1;
            pkm.randomize(&mut rng);
            assert!(pkm.type_ix() < 3);
            assert_eq!(pkm.health(), pkm.max_health());
            // one move per type, in catalog order
            assert_eq!(pkm.moveset(), &[0, 1, 2]);
        }
    }

    #[test]
    fn test_randomize_with_larger_catalog() {
        let mut rng = Rng::with_seed(7);
        let config = PokemonConfig::default().types_map(six_types());
        let mut pkm = Pokemon::build(&config);

        for _ in 0..100 {
            pkm.randomize(&mut rng);
            assert_eq!(pkm.moveset().len(), 4);
            // the first move is the pokemon's own type
            assert_eq!(pkm.moveset()[0], pkm.type_ix());
            // moves are distinct
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(pkm.moveset()[i], pkm.moveset()[j]);
                }
            }
        }
    }

    #[test]
    fn test_restore_keeps_type_and_moveset() {
        let mut rng = Rng::with_seed(0);
        let mut pkm = Pokemon::build(&PokemonConfig::default());
        pkm.randomize(&mut rng);
        let type_ix = pkm.type_ix();
        let moveset = pkm.moveset().to_vec();

        pkm.apply_damage(150);
        assert!(pkm.is_fainted());
        assert_eq!(pkm.health(), 0);

        pkm.restore();
        assert_eq!(pkm.health(), pkm.max_health());
        assert_eq!(pkm.type_ix(), type_ix);
        assert_eq!(pkm.moveset(), &moveset[..]);
    }

    #[test]
    fn test_display() {
        let mut pkm = Pokemon::build(&PokemonConfig::default());
        pkm.moveset = vec![0, 1, 2];
        assert_eq!(
            format!("{}", pkm),
            "fire (100/100) [\"fire\", \"water\", \"grass\"]"
        );
    }
}
