//! Wire and storage records exchanged with the game server.

pub use api::*;
pub use error::*;
pub use record::*;

mod api;
mod error;
mod record;
