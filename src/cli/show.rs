use clap::Parser;
use procedures::ProcedureId;
use serde_json::json;
use tracing::instrument;

use super::{render::render_card, terminal::Colorize, Context};

#[derive(Debug, Parser)]
#[command(about = "Display a procedure card")]
pub struct Show {
    /// The identifier of the procedure to display (e.g. C4.1)
    id: ProcedureId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self, context), fields(id = %self.id))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalogue = context.catalogue;

        let Some(procedure) = catalogue.get(&self.id) else {
            eprintln!("Procedure {} not found", self.id);
            std::process::exit(1);
        };

        let mut referenced_by: Vec<_> = catalogue
            .references_to(&self.id)
            .map(|reference| reference.from.id().as_str())
            .collect();
        referenced_by.dedup();

        match self.output {
            OutputFormat::Pretty => {
                print!("{}", render_card(procedure, catalogue, true, false));
                if !referenced_by.is_empty() {
                    println!(
                        "  {} {}",
                        "Referenced by:".dim(),
                        referenced_by.join(", ")
                    );
                }
            }
            OutputFormat::Json => {
                let mut output = serde_json::to_value(procedure)?;
                output["referenced_by"] = json!(referenced_by);
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }

        Ok(())
    }
}
