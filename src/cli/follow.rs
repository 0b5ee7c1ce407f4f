use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use procedures::{navigation::ContainerKind, CardDeck, NavigationController, ProcedureId};
use tracing::instrument;

use super::{
    render::{render_container, TerminalSurface},
    terminal::Colorize,
    Context,
};

#[derive(Debug, Parser)]
#[command(about = "Follow a conditional's cross-reference")]
pub struct Follow {
    /// The procedure holding the conditional
    id: ProcedureId,

    /// Which conditional to activate (1-based, as numbered on the card)
    conditional: usize,

    /// The container to navigate in
    #[arg(long, default_value = "browser")]
    container: Container,

    /// Close the container this many milliseconds after the scroll, instead of
    /// waiting for every timer
    #[arg(long, value_name = "MS")]
    hold: Option<u64>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Container {
    Browser,
    Emergency,
}

impl From<Container> for ContainerKind {
    fn from(container: Container) -> Self {
        match container {
            Container::Browser => Self::Browser,
            Container::Emergency => Self::Emergency,
        }
    }
}

impl Follow {
    #[instrument(level = "debug", skip(self, context), fields(id = %self.id))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let Some(procedure) = context.catalogue.get(&self.id) else {
            bail!("Procedure {} not found", self.id);
        };

        let Some(conditional) = self
            .conditional
            .checked_sub(1)
            .and_then(|index| procedure.conditionals().get(index))
        else {
            bail!(
                "{} has {} conditionals, no conditional {}",
                self.id,
                procedure.conditionals().len(),
                self.conditional
            );
        };

        let Some(target) = conditional.reference_id() else {
            bail!(
                "Conditional {} of {} does not reference another procedure",
                self.conditional,
                self.id
            );
        };

        let mut controller = match ContainerKind::from(self.container) {
            ContainerKind::Browser => {
                NavigationController::browser(context.catalogue, context.config)
            }
            ContainerKind::Emergency => {
                NavigationController::emergency(context.catalogue, context.config)
            }
        };
        let mut deck = CardDeck::default();
        let mut surface = TerminalSurface::default();
        render_container(&controller, &mut deck, &mut surface);

        println!(
            "{}",
            format!("IF {} → {}", conditional.condition, conditional.action).strong()
        );
        controller.activate(conditional);

        let screen = render_container(&controller, &mut deck, &mut surface);
        controller.rendered(&mut surface);
        if surface.scrolled_to().is_none() {
            controller.advance(context.config.reveal_delay(), &mut surface);
        }

        println!("{screen}");
        match surface.scrolled_to() {
            Some(id) => println!(
                "{}",
                format!("Scrolled to {id} at {} ms", controller.now().as_millis()).success()
            ),
            None => println!(
                "{}",
                format!("{target} is not shown in this container; no scroll").warning()
            ),
        }

        let hold = self.hold.map(Duration::from_millis);
        match (hold, controller.next_deadline()) {
            (Some(hold), Some(deadline)) if hold < deadline => {
                controller.advance(hold, &mut surface);
            }
            (_, Some(deadline)) => {
                controller.advance(deadline, &mut surface);
                println!(
                    "{}",
                    format!("Highlight cleared at {} ms", controller.now().as_millis()).dim()
                );
            }
            (_, None) => {}
        }

        let at = controller.now();
        let closed = controller.close();
        if closed.highlight_clear || closed.scroll {
            println!(
                "{}",
                format!(
                    "Closed at {} ms; cancelled highlight clear: {}, scroll: {}",
                    at.as_millis(),
                    closed.highlight_clear,
                    closed.scroll
                )
                .dim()
            );
        }

        Ok(())
    }
}
