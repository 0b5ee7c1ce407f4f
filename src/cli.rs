use std::path::PathBuf;

mod emergency;
mod export;
mod follow;
mod list;
mod render;
mod show;
mod terminal;
mod validate;

use clap::ArgAction;
use emergency::Emergency;
use export::Export;
use follow::Follow;
use list::List;
use procedures::{storage, Catalogue, Config};
use show::Show;
use tracing::{debug, instrument};
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Read procedures from a catalogue file instead of the built-in set
    #[arg(long, value_name = "PATH", global = true)]
    catalogue: Option<PathBuf>,

    /// Navigation settings file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e))?,
            None => Config::default(),
        };

        let loaded;
        let catalogue = match &self.catalogue {
            Some(path) => {
                loaded = load_catalogue(path)?;
                &loaded
            }
            None => procedures::catalogue(),
        };

        let context = Context {
            catalogue,
            config: &config,
        };

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[instrument]
fn load_catalogue(path: &std::path::Path) -> anyhow::Result<Catalogue> {
    use anyhow::Context as _;

    let catalogue = storage::load(path)
        .with_context(|| format!("Failed to load catalogue from {}", path.display()))?;
    debug!(procedures = catalogue.len(), "loaded catalogue file");
    Ok(catalogue)
}

/// What every command runs against.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub catalogue: &'a Catalogue,
    pub config: &'a Config,
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List procedures by category (default)
    List(List),

    /// Show a single procedure card
    Show(Show),

    /// Check that every cross-reference resolves
    Validate(Validate),

    /// Follow a conditional's cross-reference and show where it lands
    ///
    /// Simulates activating the reference button on one of a procedure's
    /// conditionals inside a presentation container.
    Follow(Follow),

    /// Open the emergency view
    Emergency(Emergency),

    /// Write the catalogue as a TOML document
    Export(Export),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(context)?,
            Self::Show(command) => command.run(context)?,
            Self::Validate(command) => command.run(context)?,
            Self::Follow(command) => command.run(context)?,
            Self::Emergency(command) => command.run(context)?,
            Self::Export(command) => command.run(context)?,
        }
        Ok(())
    }
}
