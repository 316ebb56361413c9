use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "In Progress" => Some(Self::InProgress),
            "Won" => Some(Self::Won),
            "Lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

/// How a grid that is not won is judged lost after a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossRule {
    /// Lost only when no direction changes the grid. Used in live play.
    NoMoves,
    /// Also lost when any number leaves the value bound. Used by replays.
    Strict,
}

impl LossRule {
    pub fn state_of(self, grid: &Grid, valid_moves: DirectionSet) -> GameState {
        match self {
            Self::Strict => grid.status(valid_moves),
            Self::NoMoves if grid.is_won() => GameState::Won,
            Self::NoMoves if valid_moves.is_empty() => GameState::Lost,
            Self::NoMoves => GameState::InProgress,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored,
    Moved,
    Won,
    Lost,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            Ignored => false,
            Moved => true,
            Won => true,
            Lost => true,
        }
    }
}

/// Serializable view of a session, enough to load it back with [`load_game`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: Array2<Tile>,
    pub round_num: u32,
    pub state: GameState,
    pub config: GameConfig,
}

/// One game in progress or finished. Owns its grid outright.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    grid: Grid,
    round_num: u32,
    state: GameState,
    valid_moves: DirectionSet,
}

impl Session {
    /// Empty grid plus the first spawn, at round 1.
    pub fn new<R: TileRng>(config: GameConfig, rng: &mut R) -> Result<Self> {
        Self::start(config, rng, LossRule::NoMoves)
    }

    /// Like [`Session::new`], judging the first spawn by `rule`.
    pub(crate) fn start<R: TileRng>(
        config: GameConfig,
        rng: &mut R,
        rule: LossRule,
    ) -> Result<Self> {
        let mut grid = Grid::empty(config)?;
        generate_tiles(&mut grid, rng);
        let mut valid_moves = grid.valid_moves()?;
        let state = rule.state_of(&grid, valid_moves);
        if state.is_finished() {
            log::debug!("New game is already {:?} after the first spawn", state);
            valid_moves = DirectionSet::empty();
        }

        Ok(Self {
            grid,
            round_num: 1,
            state,
            valid_moves,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        self.grid.config()
    }

    pub fn round_num(&self) -> u32 {
        self.round_num
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn valid_moves(&self) -> DirectionSet {
        self.valid_moves
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.grid.cells().clone(),
            round_num: self.round_num,
            state: self.state,
            config: self.grid.config().clone(),
        }
    }

    /// Live move. Invalid directions and finished games are no-ops.
    pub fn apply_move<R: TileRng>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Result<MoveOutcome> {
        self.advance(direction, rng, LossRule::NoMoves)
    }

    /// Starts over with a fresh grid, discarding this game.
    pub fn restart<R: TileRng>(&mut self, config: GameConfig, rng: &mut R) -> Result<()> {
        *self = Self::new(config, rng)?;
        Ok(())
    }

    /// The one move body shared by live play and replay verification.
    pub(crate) fn advance<R: TileRng>(
        &mut self,
        direction: Direction,
        rng: &mut R,
        rule: LossRule,
    ) -> Result<MoveOutcome> {
        if !self.state.is_in_progress() || !self.valid_moves.has(direction) {
            return Ok(MoveOutcome::Ignored);
        }

        self.grid.slide(direction)?;
        if self.grid.is_won() {
            self.state = GameState::Won;
            self.valid_moves = DirectionSet::empty();
            log::debug!("Round {} won moving {}", self.round_num, direction);
            return Ok(MoveOutcome::Won);
        }

        self.round_num += 1;
        generate_tiles(&mut self.grid, rng);
        self.valid_moves = self.grid.valid_moves()?;
        self.state = rule.state_of(&self.grid, self.valid_moves);
        if self.state.is_finished() {
            self.valid_moves = DirectionSet::empty();
        }
        log::debug!(
            "Moved {}, now round {} and {:?}",
            direction,
            self.round_num,
            self.state
        );

        Ok(match self.state {
            GameState::InProgress => MoveOutcome::Moved,
            GameState::Won => MoveOutcome::Won,
            GameState::Lost => MoveOutcome::Lost,
        })
    }
}

pub fn new_game<R: TileRng>(config: GameConfig, rng: &mut R) -> Result<Session> {
    Session::new(config, rng)
}

/// Rebuilds a session from stored parts, refusing anything inconsistent.
///
/// The declared state is accepted when it matches the live rule or the
/// stricter replay rule, since stored games may have been finished by
/// either. Nothing is repaired here; callers decide whether to reset.
pub fn load_game<R: AsRef<[Tile]>>(
    rows: &[R],
    round_num: u32,
    state: GameState,
    config: GameConfig,
) -> Result<Session> {
    let grid = Grid::from_rows(rows, config).inspect_err(|err| {
        log::warn!("Refusing to load game: {}", err);
    })?;
    finish_load(grid, round_num, state)
}

/// Same as [`load_game`], starting from a snapshot.
pub fn load_snapshot(snapshot: Snapshot) -> Result<Session> {
    let grid = Grid::from_cells(snapshot.cells, snapshot.config).inspect_err(|err| {
        log::warn!("Refusing to load snapshot: {}", err);
    })?;
    finish_load(grid, snapshot.round_num, snapshot.state)
}

fn finish_load(grid: Grid, round_num: u32, declared: GameState) -> Result<Session> {
    if round_num == 0 {
        log::warn!("Refusing to load game at round 0");
        return Err(CorruptGame::InvalidRound(round_num).into());
    }

    let valid_moves = grid.valid_moves()?;
    let strict = LossRule::Strict.state_of(&grid, valid_moves);
    let live = LossRule::NoMoves.state_of(&grid, valid_moves);
    if declared != strict && declared != live {
        log::warn!(
            "Refusing to load game declared {:?} but computed {:?}",
            declared,
            strict
        );
        return Err(CorruptGame::StateMismatch {
            declared,
            computed: strict,
        }
        .into());
    }

    let valid_moves = if declared.is_finished() {
        DirectionSet::empty()
    } else {
        valid_moves
    };

    Ok(Session {
        grid,
        round_num,
        state: declared,
        valid_moves,
    })
}
