use anyhow::{Context, Result};
use clap::Parser;
use opmerge_core::SeedRng;
use opmerge_protocol::{GameRecord, Loaded};
use std::path::PathBuf;

/// Load a stored game record, resetting it if corrupt
#[derive(Parser, Debug)]
pub struct Check {
    /// Stored game record
    #[arg(value_name = "FILE")]
    record: PathBuf,

    /// Overwrite the file with the fresh game when it had to be reset
    #[arg(long)]
    repair: bool,

    /// Seed for the replacement game
    #[arg(short, long)]
    seed: Option<String>,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let content = std::fs::read_to_string(&self.record)
            .with_context(|| format!("Failed to read {}", self.record.display()))?;
        let seed = self.seed.unwrap_or_else(super::mint_seed);
        let loaded = GameRecord::load_or_reset(&content, &mut SeedRng::new(&seed))?;

        match &loaded {
            Loaded::Restored(_) => println!("record is valid"),
            Loaded::Reset { reason, .. } => {
                println!("record is corrupt: {reason}");
                println!("replacement seed: {seed}");
            }
        }
        super::print_session(loaded.session());

        if self.repair && loaded.was_reset() {
            let json = GameRecord::from_session(loaded.session()).to_json()?;
            std::fs::write(&self.record, json)
                .with_context(|| format!("Failed to write {}", self.record.display()))?;
            log::info!("Rewrote {}", self.record.display());
        }
        Ok(())
    }
}
