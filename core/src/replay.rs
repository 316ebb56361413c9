//! Server-side verification of a finished or abandoned game.
//!
//! A client submits the seed it was handed and the directions it played. The
//! game is rebuilt from scratch with the same generator, so the verdict never
//! depends on anything the client claims about the grid.

use serde::{Deserialize, Serialize};

use crate::*;

/// Why a replay was refused. The index points into the submitted moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    MoveAfterEnd { index: usize },
    IllegalMove { index: usize, direction: Direction },
}

/// How a verified (or refused) game counts toward player statistics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credit {
    Win,
    Loss,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub accepted: bool,
    pub terminal_state: GameState,
    /// Round reached when the replay finished or was refused.
    pub rounds: u32,
    pub rejection: Option<Rejection>,
}

impl VerificationResult {
    fn rejected(session: &Session, rejection: Rejection) -> Self {
        Self {
            accepted: false,
            terminal_state: session.state(),
            rounds: session.round_num(),
            rejection: Some(rejection),
        }
    }

    /// Verdict for a finished game report.
    pub fn credit(&self) -> Credit {
        match (self.accepted, self.terminal_state) {
            (true, GameState::Won) => Credit::Win,
            (true, GameState::Lost) => Credit::Loss,
            _ => Credit::Abandoned,
        }
    }

    /// Verdict for a restart request. A game that already ended cannot be
    /// restarted, so there is nothing to credit.
    pub fn restart_credit(&self) -> Option<Credit> {
        if self.accepted && self.terminal_state.is_finished() {
            None
        } else {
            Some(Credit::Abandoned)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    config: GameConfig,
}

impl Replay {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn standard() -> Self {
        Self::new(GameConfig::standard())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn verify(&self, seed: &str, moves: &[Direction]) -> Result<VerificationResult> {
        let mut rng = SeedRng::new(seed);
        let mut session = Session::start(self.config.clone(), &mut rng, LossRule::Strict)?;

        for (index, &direction) in moves.iter().enumerate() {
            let rejection = if !session.state().is_in_progress() {
                Some(Rejection::MoveAfterEnd { index })
            } else if !session.valid_moves().has(direction) {
                Some(Rejection::IllegalMove { index, direction })
            } else {
                None
            };
            if let Some(rejection) = rejection {
                log::warn!("Replay for seed {:?} rejected: {:?}", seed, rejection);
                return Ok(VerificationResult::rejected(&session, rejection));
            }

            session.advance(direction, &mut rng, LossRule::Strict)?;
        }

        log::debug!(
            "Replay for seed {:?} accepted after {} moves, {:?} at round {}",
            seed,
            moves.len(),
            session.state(),
            session.round_num()
        );
        Ok(VerificationResult {
            accepted: true,
            terminal_state: session.state(),
            rounds: session.round_num(),
            rejection: None,
        })
    }
}

impl Default for Replay {
    fn default() -> Self {
        Self::standard()
    }
}

/// Verifies against the standard configuration.
pub fn verify_replay(seed: &str, moves: &[Direction]) -> VerificationResult {
    Replay::standard().judge(seed, moves)
}

impl Replay {
    /// Like [`Replay::verify`], but an engine fault becomes a refusal with no
    /// [`Rejection`], since no submitted move is to blame.
    pub fn judge(&self, seed: &str, moves: &[Direction]) -> VerificationResult {
        self.verify(seed, moves).unwrap_or_else(|err| {
            log::error!("Replay for seed {:?} failed: {}", seed, err);
            VerificationResult {
                accepted: false,
                terminal_state: GameState::InProgress,
                rounds: 1,
                rejection: None,
            }
        })
    }
}

/// Parses direction tokens such as `up` or `left`.
pub fn parse_moves<S: AsRef<str>>(tokens: &[S]) -> Result<alloc::vec::Vec<Direction>> {
    tokens.iter().map(|token| token.as_ref().parse()).collect()
}
