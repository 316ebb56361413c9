use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const STANDARD_SIZE: Coord2 = (6, 7);
pub const STANDARD_SPAWN_RATE: f64 = 0.67;
pub const STANDARD_TILES_PER_TURN: u8 = 2;
pub const WIN_VALUE: i64 = 67;
pub const VALUE_BOUND: i64 = 1000;

/// Rules a grid is created with. Immutable for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub operators: OperatorSet,
    pub operator_spawn_rate: f64,
    pub digits: Vec<u8>,
    pub tiles_per_turn: u8,
    pub win_value: i64,
    /// Numbers outside `[-bound, bound]` lose the game.
    pub bound: i64,
}

impl GameConfig {
    pub fn standard() -> Self {
        Self {
            size: STANDARD_SIZE,
            operators: OperatorSet::ADDITION | OperatorSet::SUBTRACTION,
            operator_spawn_rate: STANDARD_SPAWN_RATE,
            digits: (0..=9).collect(),
            tiles_per_turn: STANDARD_TILES_PER_TURN,
            win_value: WIN_VALUE,
            bound: VALUE_BOUND,
        }
    }

    pub fn with_size(self, size: Coord2) -> Self {
        Self { size, ..self }
    }

    pub const fn rows(&self) -> usize {
        self.size.0 as usize
    }

    pub const fn cols(&self) -> usize {
        self.size.1 as usize
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.operator_spawn_rate) {
            return Err(GameError::InvalidConfig(
                "operator spawn rate must be within [0, 1]",
            ));
        }
        if self.operators.is_empty() && self.operator_spawn_rate > 0.0 {
            return Err(GameError::InvalidConfig(
                "operators can spawn but none are enabled",
            ));
        }
        if self.digits.is_empty() && self.operator_spawn_rate < 1.0 {
            return Err(GameError::InvalidConfig("digit pool is empty"));
        }
        if self.bound < 0 {
            return Err(GameError::InvalidConfig("value bound is negative"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
