use bitflags::bitflags;
use core::fmt;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Binary operator carried by an operator tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Addition,
    Subtraction,
    Multiplication,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Self::Addition, Self::Subtraction, Self::Multiplication];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub const fn flag(self) -> OperatorSet {
        match self {
            Self::Addition => OperatorSet::ADDITION,
            Self::Subtraction => OperatorSet::SUBTRACTION,
            Self::Multiplication => OperatorSet::MULTIPLICATION,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SymbolVisitor;

        impl Visitor<'_> for SymbolVisitor {
            type Value = Operator;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of \"+\", \"-\" or \"*\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Operator, E> {
                Operator::from_symbol(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(SymbolVisitor)
    }
}

bitflags! {
    /// Operators enabled for a game, both for spawning and for evaluation.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OperatorSet: u8 {
        const ADDITION = 1;
        const SUBTRACTION = 1 << 1;
        const MULTIPLICATION = 1 << 2;
    }
}

impl OperatorSet {
    pub const fn enables(self, op: Operator) -> bool {
        self.contains(op.flag())
    }

    /// Enabled operators in `+`, `-`, `*` order.
    pub fn operators(self) -> impl Iterator<Item = Operator> {
        Operator::ALL.into_iter().filter(move |&op| self.enables(op))
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, op| set | op.flag())
    }
}

/// Content of a single grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    Number(i64),
    Operator(Operator),
    #[default]
    Blank,
}

impl Tile {
    /// Blank token used by stored game records.
    pub const BLANK_TOKEN: &'static str = " ";

    /// Blank token used by the text grid form.
    pub const BLANK_TEXT: &'static str = ".";

    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    pub const fn is_operator(self) -> bool {
        matches!(self, Self::Operator(_))
    }

    pub const fn as_number(self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_operator(self) -> Option<Operator> {
        match self {
            Self::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Parses either blank token, an operator symbol, or a decimal integer.
    pub fn parse_token(token: &str) -> Option<Self> {
        if token == Self::BLANK_TOKEN || token == Self::BLANK_TEXT {
            return Some(Self::Blank);
        }
        if let Some(op) = Operator::from_symbol(token) {
            return Some(Self::Operator(op));
        }
        token.parse().ok().map(Self::Number)
    }
}

impl From<Operator> for Tile {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

impl From<i64> for Tile {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Operator(op) => f.write_str(op.symbol()),
            Self::Blank => f.write_str(Self::BLANK_TEXT),
        }
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Number(value) => serializer.serialize_i64(value),
            Self::Operator(op) => serializer.serialize_str(op.symbol()),
            Self::Blank => serializer.serialize_str(Self::BLANK_TOKEN),
        }
    }
}

struct TileVisitor;

impl Visitor<'_> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, an operator symbol or a blank")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Tile, E> {
        Ok(Tile::Number(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tile, E> {
        i64::try_from(v)
            .map(Tile::Number)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Tile, E> {
        match v {
            Tile::BLANK_TOKEN => Ok(Tile::Blank),
            _ => Operator::from_symbol(v)
                .map(Tile::Operator)
                .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TileVisitor)
    }
}
