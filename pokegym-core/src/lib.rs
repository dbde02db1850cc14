#![warn(missing_docs)]
//! Core abstractions of the pokegym library.
//!
//! The crate defines the interfaces between an environment ([`Env`]), its
//! observations ([`Obs`]) and actions ([`Act`]), and the policies and agents
//! acting on it ([`Policy`], [`Agent`]). Training metrics flow through the
//! [`record`] module, while [`Trainer`] and [`Evaluator`] drive online
//! training and evaluation loops.
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Agent, Configurable, Env, Info, Obs, Policy, Step, Transition};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

pub use error::PokegymError;
