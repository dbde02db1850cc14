#![warn(missing_docs)]
//! A one-on-one turn-based battle environment between two typed pokemon.
//!
//! The crate provides the [`BattleEnv`] family, three variants of the same
//! battle mechanic with increasingly rich observations:
//!
//! * [`Variant::V0`] observes the opponent's type only,
//! * [`Variant::V1`] observes both types,
//! * [`Variant::V2`] additionally observes the agent's moveset.
//!
//! A battle episode runs until one of the two [`Pokemon`] faints. On each
//! step the agent attacks first with a move from its moveset; if the
//! opponent survives, it attacks back, choosing either a random move or the
//! most effective one depending on [`OpponentMode`]. Damage is scaled by a
//! caller-supplied type-effectiveness chart.
mod act;
mod config;
mod env;
mod obs;
mod pokemon;

pub use act::BattleAct;
pub use config::{BattleEnvConfig, OpponentMode, Variant};
pub use env::{BattleEnv, BattleInfo};
pub use obs::BattleObs;
pub use pokemon::{Pokemon, PokemonConfig};
