use opmerge_core::{
    CorruptGame, GameConfig, GameError, GameState, Operator, Session, Tile, TileRng, load_game,
    new_game,
};
use serde::{Deserialize, Serialize};

use crate::*;

/// A game as the persistence layer stores it, one JSON object per player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub grid: Vec<Vec<Tile>>,
    pub rows: usize,
    pub columns: usize,
    pub included_operations: Vec<Operator>,
    pub operator_spawn_rate: f64,
    pub included_digits: Vec<u8>,
    pub generated_tiles_per_turn: u8,
    #[serde(alias = "round_num")]
    pub round: u32,
    pub state: GameState,
}

/// Result of [`GameRecord::load_or_reset`].
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    Restored(Session),
    /// The stored game was refused and a fresh standard game took its place.
    Reset { session: Session, reason: CorruptGame },
}

impl Loaded {
    pub fn session(&self) -> &Session {
        match self {
            Self::Restored(session) | Self::Reset { session, .. } => session,
        }
    }

    pub fn into_session(self) -> Session {
        match self {
            Self::Restored(session) | Self::Reset { session, .. } => session,
        }
    }

    pub fn was_reset(&self) -> bool {
        matches!(self, Self::Reset { .. })
    }
}

impl GameRecord {
    pub fn from_session(session: &Session) -> Self {
        let config = session.config();
        Self {
            grid: session.grid().to_rows(),
            rows: config.rows(),
            columns: config.cols(),
            included_operations: config.operators.operators().collect(),
            operator_spawn_rate: config.operator_spawn_rate,
            included_digits: config.digits.clone(),
            generated_tiles_per_turn: config.tiles_per_turn,
            round: session.round_num(),
            state: session.state(),
        }
    }

    /// Parses a stored record. Anything that is not a well-formed record
    /// counts as corruption.
    pub fn parse(json: &str) -> std::result::Result<Self, CorruptGame> {
        serde_json::from_str(json).map_err(|err| CorruptGame::Malformed(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rules the record was created with. Win value and bound are not stored
    /// and always take their standard values.
    pub fn config(&self) -> std::result::Result<GameConfig, CorruptGame> {
        let dimension = |value: usize, name: &str| {
            u8::try_from(value)
                .ok()
                .ok_or_else(|| CorruptGame::Malformed(format!("{name} out of range: {value}")))
        };

        Ok(GameConfig {
            size: (dimension(self.rows, "rows")?, dimension(self.columns, "columns")?),
            operators: self.included_operations.iter().copied().collect(),
            operator_spawn_rate: self.operator_spawn_rate,
            digits: self.included_digits.clone(),
            tiles_per_turn: self.generated_tiles_per_turn,
            ..GameConfig::standard()
        })
    }

    pub fn into_session(self) -> opmerge_core::Result<Session> {
        let config = self.config()?;
        load_game(&self.grid, self.round, self.state, config).map_err(|err| match err {
            GameError::InvalidConfig(reason) => CorruptGame::Malformed(reason.into()).into(),
            other => other,
        })
    }

    /// Loads a stored game, replacing it with a fresh standard game when it
    /// is corrupt. The caller always learns that a reset happened.
    pub fn load_or_reset<R: TileRng>(json: &str, rng: &mut R) -> Result<Loaded> {
        let reason = match Self::parse(json).map_err(GameError::from).and_then(Self::into_session) {
            Ok(session) => return Ok(Loaded::Restored(session)),
            Err(GameError::Corrupt(reason)) => reason,
            Err(other) => return Err(other.into()),
        };

        log::warn!("Stored game is corrupt, starting over: {}", reason);
        let session = new_game(GameConfig::standard(), rng)?;
        Ok(Loaded::Reset { session, reason })
    }
}

impl From<&Session> for GameRecord {
    fn from(session: &Session) -> Self {
        Self::from_session(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opmerge_core::{Direction, SeedRng};
    use serde_json::{Value, json};

    fn stored_game() -> (Session, Value) {
        let mut rng = SeedRng::new("s1");
        let mut session = new_game(GameConfig::standard(), &mut rng).unwrap();
        session.apply_move(Direction::Up, &mut rng).unwrap();
        let value = serde_json::to_value(GameRecord::from_session(&session)).unwrap();
        (session, value)
    }

    fn load(value: &Value) -> Loaded {
        GameRecord::load_or_reset(&value.to_string(), &mut SeedRng::new("reset")).unwrap()
    }

    fn reset_reason(value: &Value) -> CorruptGame {
        match load(value) {
            Loaded::Reset { session, reason } => {
                assert_eq!(session.round_num(), 1);
                assert_eq!(session.state(), GameState::InProgress);
                reason
            }
            Loaded::Restored(session) => panic!("expected a reset, restored {session:?}"),
        }
    }

    #[test]
    fn record_uses_storage_field_names() {
        let (_, value) = stored_game();

        assert_eq!(value["rows"], 6);
        assert_eq!(value["columns"], 7);
        assert_eq!(value["included_operations"], json!(["+", "-"]));
        assert_eq!(value["operator_spawn_rate"], 0.67);
        assert_eq!(value["included_digits"], json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]));
        assert_eq!(value["generated_tiles_per_turn"], 2);
        assert_eq!(value["round"], 2);
        assert_eq!(value["state"], "In Progress");
        assert_eq!(value["grid"][0][3], "+");
        assert_eq!(value["grid"][0][6], "-");
        assert_eq!(value["grid"][5][6], " ");
    }

    #[test]
    fn stored_game_is_restored() {
        let (session, value) = stored_game();

        let loaded = load(&value);

        assert!(!loaded.was_reset());
        assert_eq!(loaded.into_session(), session);
    }

    #[test]
    fn legacy_round_num_field_is_accepted() {
        let (session, mut value) = stored_game();
        let round = value["round"].take();
        value.as_object_mut().unwrap().remove("round");
        value["round_num"] = round;

        assert_eq!(load(&value).session(), &session);
    }

    #[test]
    fn wrong_dimensions_reset() {
        let (_, mut value) = stored_game();
        value["grid"] = json!([[0, 0]]);

        assert!(matches!(
            reset_reason(&value),
            CorruptGame::InvalidDimensions {
                found_rows: 1,
                found_cols: 2,
                ..
            }
        ));
    }

    #[test]
    fn malformed_rows_and_tiles_reset() {
        let (_, mut value) = stored_game();
        value["grid"][0] = json!("not a list");
        assert!(matches!(reset_reason(&value), CorruptGame::Malformed(_)));

        let (_, mut value) = stored_game();
        value["grid"][0][0] = json!({"illegal": "tile"});
        assert!(matches!(reset_reason(&value), CorruptGame::Malformed(_)));

        assert!(matches!(
            reset_reason(&json!("definitely not a game")),
            CorruptGame::Malformed(_)
        ));
    }

    #[test]
    fn disabled_operator_tile_resets() {
        let (_, mut value) = stored_game();
        value["grid"][3][3] = json!("*");

        assert_eq!(
            reset_reason(&value),
            CorruptGame::InvalidTile { row: 3, col: 3 }
        );
    }

    #[test]
    fn inconsistent_state_or_round_resets() {
        let (_, mut value) = stored_game();
        value["state"] = json!("Won");
        assert!(matches!(
            reset_reason(&value),
            CorruptGame::StateMismatch {
                declared: GameState::Won,
                ..
            }
        ));

        let (_, mut value) = stored_game();
        value["round"] = json!(0);
        assert_eq!(reset_reason(&value), CorruptGame::InvalidRound(0));

        let (_, mut value) = stored_game();
        value["state"] = json!("Paused");
        assert!(matches!(reset_reason(&value), CorruptGame::Malformed(_)));
    }

    #[test]
    fn bad_rules_reset() {
        let (_, mut value) = stored_game();
        value["operator_spawn_rate"] = json!(4.2);
        assert!(matches!(reset_reason(&value), CorruptGame::Malformed(_)));

        let (_, mut value) = stored_game();
        value["rows"] = json!(300);
        assert!(matches!(reset_reason(&value), CorruptGame::Malformed(_)));
    }

    #[test]
    fn zero_row_record_is_restored() {
        let (_, mut value) = stored_game();
        value["rows"] = json!(0);
        value["grid"] = json!([]);
        value["state"] = json!("Lost");

        let session = load(&value).into_session();

        assert_eq!(session.config().size, (0, 7));
        assert_eq!(session.state(), GameState::Lost);
        assert!(session.valid_moves().is_empty());
        assert_eq!(GameRecord::from_session(&session).grid, Vec::<Vec<Tile>>::new());
    }
}
