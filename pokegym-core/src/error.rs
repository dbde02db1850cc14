//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum PokegymError {
    /// An action index outside the valid range of the environment.
    ///
    /// This is a caller contract violation and is not recovered internally.
    #[error("Invalid action index {act}, must be in [0, {n_acts})")]
    InvalidAction {
        /// The offending action index.
        act: usize,

        /// The number of valid actions.
        n_acts: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
