use opmerge_core::{Credit, Direction, VerificationResult, verify_replay};
use serde::{Deserialize, Serialize};

use crate::*;

/// Body of a verify call: the seed the client was given and every move it made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub seed: String,
    pub moves: Vec<Direction>,
}

impl VerifyRequest {
    pub fn verify(&self) -> VerificationResult {
        verify_replay(&self.seed, &self.moves)
    }
}

/// Body of a restart call. An unverified restart carries the replay of the
/// game being abandoned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartRequest {
    pub verified: bool,
    #[serde(flatten)]
    pub replay: Option<VerifyRequest>,
}

impl RestartRequest {
    /// `None` when the replayed game already ended and cannot be restarted.
    pub fn credit(&self) -> Result<Option<Credit>> {
        if self.verified {
            return Ok(Some(Credit::Abandoned));
        }
        let replay = self.replay.as_ref().ok_or(ProtocolError::MissingReplay)?;
        Ok(replay.verify().restart_credit())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub user_id: String,
    pub wins: u32,
    pub losses: u32,
    pub abandoned: u32,
}

impl PlayerStats {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, credit: Credit) {
        let counter = match credit {
            Credit::Win => &mut self.wins,
            Credit::Loss => &mut self.losses,
            Credit::Abandoned => &mut self.abandoned,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total_games(&self) -> u32 {
        self.wins
            .saturating_add(self.losses)
            .saturating_add(self.abandoned)
    }

    /// Credits a verified replay and builds the response for it.
    pub fn record_verification(&mut self, result: &VerificationResult) -> VerifyResponse {
        let credit = result.credit();
        self.apply(credit);
        VerifyResponse {
            verified: credit != Credit::Abandoned,
            message: (credit == Credit::Abandoned).then(|| "Game verification failed".to_owned()),
            stats: self.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub stats: PlayerStats,
}
