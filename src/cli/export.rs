use std::path::PathBuf;

use clap::Parser;
use procedures::storage;
use tracing::instrument;

use super::Context;

#[derive(Debug, Parser)]
#[command(about = "Write the catalogue as a TOML document")]
pub struct Export {
    /// Write to this file instead of standard output
    #[arg(long, short)]
    out: Option<PathBuf>,
}

impl Export {
    #[instrument(level = "debug", skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let document = storage::to_toml(context.catalogue)?;

        match self.out {
            Some(path) => {
                std::fs::write(&path, document)
                    .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            }
            None => print!("{document}"),
        }

        Ok(())
    }
}
