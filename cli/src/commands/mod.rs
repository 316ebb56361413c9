mod check;
mod new;
mod play;
mod verify;

pub use check::Check;
pub use new::New;
pub use play::Play;
pub use verify::Verify;

use anyhow::{Context, Result};
use opmerge_core::{Direction, Session, parse_moves};
use rand::Rng;
use std::io::Read;

/// A fresh seed for games started without one.
fn mint_seed() -> String {
    format!("{:016x}", rand::rng().random::<u64>())
}

/// Moves from the command line, or whitespace separated from stdin when none
/// were given.
fn read_moves(tokens: &[String]) -> Result<Vec<Direction>> {
    if !tokens.is_empty() {
        return Ok(parse_moves(tokens)?);
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read moves from stdin")?;
    let tokens: Vec<&str> = input.split_whitespace().collect();
    Ok(parse_moves(tokens.as_slice())?)
}

fn print_session(session: &Session) {
    print!("{}", session.grid());
    let moves: Vec<String> = session
        .valid_moves()
        .directions()
        .map(|direction| direction.to_string())
        .collect();
    println!(
        "round {} | {} | moves: {}",
        session.round_num(),
        session.state().token(),
        if moves.is_empty() {
            "none".to_owned()
        } else {
            moves.join(" ")
        }
    );
}
