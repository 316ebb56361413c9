#![no_std]

extern crate alloc;

pub use algebra::*;
pub use config::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use replay::*;
pub use rng::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod algebra;
mod config;
mod error;
mod generator;
mod grid;
mod replay;
mod rng;
mod session;
mod tile;
mod types;
