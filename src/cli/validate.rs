use clap::Parser;
use procedures::{Catalogue, IntegrityIssue, ProcedureId};
use serde_json::json;
use tracing::instrument;

use super::{terminal::Colorize, Context};

#[derive(Debug, Parser)]
#[command(about = "Check catalogue integrity")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

#[derive(Debug)]
struct ValidationResult {
    procedures: usize,
    issues: Vec<IntegrityIssue>,
    cycles: Vec<Vec<ProcedureId>>,
}

impl ValidationResult {
    fn check(catalogue: &Catalogue) -> Self {
        Self {
            procedures: catalogue.len(),
            issues: catalogue.check_integrity(),
            cycles: catalogue.cycles(),
        }
    }
}

impl Validate {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let result = ValidationResult::check(context.catalogue);

        match self.output {
            OutputFormat::Table => self.output_table(&result),
            OutputFormat::Json => Self::output_json(&result)?,
            OutputFormat::Summary => println!("issues={}", result.issues.len()),
        }

        // Exit with appropriate code
        if !result.issues.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, result: &ValidationResult) {
        if self.quiet {
            return;
        }

        println!("Validating catalogue...\n");
        println!("✓ Identifiers: {} procedures, all unique", result.procedures);

        if result.issues.is_empty() {
            println!("✓ References:  every cross-reference resolves");
        } else {
            println!(
                "{}",
                format!("✗ References:  {} issues found", result.issues.len()).warning()
            );
            for issue in &result.issues {
                println!("  • {issue}");
            }
        }

        if !result.cycles.is_empty() {
            println!("\n{}", "Reference cycles (informational):".dim());
            for cycle in &result.cycles {
                let ids: Vec<_> = cycle.iter().map(ProcedureId::as_str).collect();
                println!("  {}", ids.join(" ⇄ ").dim());
            }
        }

        if result.issues.is_empty() {
            println!("\n{}", "Catalogue is healthy (0 issues)".success());
        } else {
            println!(
                "\n{}",
                format!("Summary: {} issues found", result.issues.len()).warning()
            );
        }
    }

    fn output_json(result: &ValidationResult) -> anyhow::Result<()> {
        let output = json!({
            "status": if result.issues.is_empty() { "healthy" } else { "issues_found" },
            "procedures": result.procedures,
            "issues": result.issues,
            "cycles": result.cycles,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
