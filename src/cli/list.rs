use clap::{Parser, ValueEnum};
use procedures::{Category, Procedure, ProcedureId};
use serde::Serialize;
use tracing::instrument;

use super::{terminal::Colorize, Context};

/// Command arguments for `procs list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List procedures grouped by category")]
pub struct List {
    /// Only list these categories (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "CATEGORY")]
    category: Vec<Category>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Print identifiers only, one per line.
    #[arg(long, short)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    title: &'a str,
    short_title: &'a str,
    category: Category,
    references: Vec<&'a str>,
}

impl<'a> From<&'a Procedure> for Row<'a> {
    fn from(procedure: &'a Procedure) -> Self {
        Self {
            id: procedure.id().as_str(),
            title: procedure.title(),
            short_title: procedure.short_title(),
            category: procedure.category(),
            references: procedure.references().map(ProcedureId::as_str).collect(),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self, context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let categories: Vec<Category> = if self.category.is_empty() {
            Category::ALL.to_vec()
        } else {
            Category::ALL
                .into_iter()
                .filter(|category| self.category.contains(category))
                .collect()
        };

        if self.quiet {
            for procedure in categories
                .iter()
                .flat_map(|&category| context.catalogue.by_category(category))
            {
                println!("{}", procedure.id());
            }
            return Ok(());
        }

        match self.output {
            OutputFormat::Table => render_table(context, &categories),
            OutputFormat::Json => {
                let rows: Vec<Row> = categories
                    .iter()
                    .flat_map(|&category| context.catalogue.by_category(category))
                    .map(Row::from)
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        }

        Ok(())
    }
}

fn render_table(context: &Context, categories: &[Category]) {
    let width = context
        .catalogue
        .iter()
        .map(|procedure| procedure.id().len())
        .max()
        .unwrap_or(0);

    for (i, &category) in categories.iter().enumerate() {
        let style = category.style();
        if i > 0 {
            println!();
        }
        println!(
            "{}",
            format!("{} {}", style.icon.glyph(), style.label)
                .tone(style.tone)
                .strong()
        );

        let mut empty = true;
        for procedure in context.catalogue.by_category(category) {
            empty = false;
            let references: Vec<_> = procedure.references().map(ProcedureId::as_str).collect();
            let references = if references.is_empty() {
                String::new()
            } else {
                format!("  → {}", references.join(", ")).dim()
            };
            println!(
                "  {:<width$}  {}{references}",
                procedure.id(),
                procedure.title()
            );
        }

        if empty {
            println!("  {}", "(none)".dim());
        }
    }
}
