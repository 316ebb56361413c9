use opmerge_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Unverified restart must include seed and moves")]
    MissingReplay,
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
