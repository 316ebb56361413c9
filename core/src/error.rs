use alloc::string::String;
use thiserror::Error;

use crate::{GameState, Operator};

/// Reasons a stored or submitted game snapshot cannot be loaded as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorruptGame {
    #[error("Grid is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("Illegal tile at row {row}, column {col}")]
    InvalidTile { row: usize, col: usize },
    #[error("Round number must be at least 1, found {0}")]
    InvalidRound(u32),
    #[error("Declared state {declared:?} does not match computed state {computed:?}")]
    StateMismatch {
        declared: GameState,
        computed: GameState,
    },
    #[error("Malformed game record: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Operator {0} is not enabled for this game")]
    UnsupportedOperator(Operator),
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Corrupt(#[from] CorruptGame),
    #[error("Unknown direction {0:?}")]
    UnknownDirection(String),
}

impl GameError {
    /// The corruption reason, when this error came from loading a snapshot.
    pub fn as_corrupt(&self) -> Option<&CorruptGame> {
        match self {
            Self::Corrupt(reason) => Some(reason),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
