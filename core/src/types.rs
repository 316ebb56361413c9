use alloc::string::ToString;
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;
use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Single coordinate axis used for grid height, width, and positions.
pub type Coord = u8;

/// Count type used for blank counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Which end of a line tiles travel toward, or where padding goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Leading,
    Trailing,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Leading => Self::Trailing,
            Self::Trailing => Self::Leading,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed order used whenever every direction is tried in turn.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub const fn flag(self) -> DirectionSet {
        match self {
            Self::Up => DirectionSet::UP,
            Self::Down => DirectionSet::DOWN,
            Self::Left => DirectionSet::LEFT,
            Self::Right => DirectionSet::RIGHT,
        }
    }

    /// End of each line the tiles move toward.
    pub const fn toward(self) -> Side {
        match self {
            Self::Up | Self::Left => Side::Leading,
            Self::Down | Self::Right => Side::Trailing,
        }
    }

    /// Axis along which the lanes reduced by this move run.
    pub(crate) const fn lane_axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis(1),
            Self::Up | Self::Down => Axis(0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.token() == token)
            .ok_or_else(|| GameError::UnknownDirection(token.to_string()))
    }
}

bitflags! {
    /// Set of directions, used for the moves that would change a grid.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DirectionSet: u8 {
        const UP = 1;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl DirectionSet {
    pub const fn has(self, direction: Direction) -> bool {
        self.contains(direction.flag())
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.has(direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, direction| set | direction.flag())
    }
}
