use anyhow::{Context, Result};
use clap::Parser;
use opmerge_core::{GameConfig, SeedRng, new_game};
use opmerge_protocol::GameRecord;
use std::path::PathBuf;

/// Start a game and print its first grid
#[derive(Parser, Debug)]
pub struct New {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<String>,

    /// Also write the game record as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl New {
    pub fn execute(self, config: GameConfig) -> Result<()> {
        let seed = self.seed.unwrap_or_else(super::mint_seed);
        let mut rng = SeedRng::new(&seed);
        let session = new_game(config, &mut rng)?;
        log::info!("Started game with seed {:?}", seed);

        println!("seed: {seed}");
        super::print_session(&session);

        if let Some(path) = self.output {
            let json = GameRecord::from_session(&session).to_json()?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}
