use anyhow::{Context, Result};
use clap::Parser;
use opmerge_core::{GameConfig, SeedRng, new_game};
use opmerge_protocol::GameRecord;
use std::path::PathBuf;

/// Play moves from a seed and show where they lead
#[derive(Parser, Debug)]
pub struct Play {
    /// Seed the game was started with
    #[arg(short, long)]
    seed: String,

    /// Write the final game record as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the grid after every move
    #[arg(long)]
    each: bool,

    /// Directions to play; read from stdin when omitted
    #[arg(value_name = "MOVE")]
    moves: Vec<String>,
}

impl Play {
    pub fn execute(self, config: GameConfig) -> Result<()> {
        let moves = super::read_moves(&self.moves)?;
        let mut rng = SeedRng::new(&self.seed);
        let mut session = new_game(config, &mut rng)?;

        for (index, direction) in moves.into_iter().enumerate() {
            let outcome = session.apply_move(direction, &mut rng)?;
            if !outcome.has_update() {
                log::warn!("Move {} ({}) ignored", index, direction);
                continue;
            }
            if self.each {
                super::print_session(&session);
                println!();
            }
        }

        super::print_session(&session);

        if let Some(path) = self.output {
            let json = GameRecord::from_session(&session).to_json()?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}
