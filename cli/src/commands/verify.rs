use anyhow::{Context, Result, bail};
use clap::Parser;
use opmerge_core::{GameConfig, Replay};
use opmerge_protocol::VerifyRequest;
use std::path::PathBuf;

/// Replay a seed and move list the way the server does
#[derive(Parser, Debug)]
pub struct Verify {
    /// Seed the game was started with
    #[arg(short, long, required_unless_present = "request")]
    seed: Option<String>,

    /// JSON verify request with `seed` and `moves`
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["seed", "moves"])]
    request: Option<PathBuf>,

    /// Directions played; read from stdin when omitted
    #[arg(value_name = "MOVE")]
    moves: Vec<String>,
}

impl Verify {
    pub fn execute(self, config: GameConfig) -> Result<()> {
        let request = match (self.request, self.seed) {
            (Some(path), _) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str::<VerifyRequest>(&content)
                    .with_context(|| format!("Invalid verify request {}", path.display()))?
            }
            (None, Some(seed)) => VerifyRequest {
                seed,
                moves: super::read_moves(&self.moves)?,
            },
            (None, None) => bail!("Either --seed or --request is required"),
        };

        let result = Replay::new(config).verify(&request.seed, &request.moves)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        println!("credit: {:?}", result.credit());
        Ok(())
    }
}
