use clap::Parser;
use procedures::{navigation::Closed, CardDeck, NavigationController, ProcedureId};
use tracing::instrument;

use super::{
    render::{render_container, TerminalSurface},
    terminal::Colorize,
    Context,
};

#[derive(Debug, Parser)]
#[command(about = "Open the emergency view")]
pub struct Emergency {
    /// Navigate to this procedure after opening
    #[arg(long, value_name = "ID")]
    goto: Option<ProcedureId>,
}

impl Emergency {
    #[instrument(level = "debug", skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let (screen, closed) = emergency_view(context, self.goto.as_ref())?;

        print!("{screen}");
        if closed.highlight_clear || closed.scroll {
            println!(
                "{}",
                format!(
                    "Closed; cancelled highlight clear: {}, scroll: {}",
                    closed.highlight_clear, closed.scroll
                )
                .dim()
            );
        }
        Ok(())
    }
}

/// Opens the emergency container, optionally navigates, and closes it again.
fn emergency_view(
    context: &Context,
    goto: Option<&ProcedureId>,
) -> anyhow::Result<(String, Closed)> {
    let mut controller = NavigationController::emergency(context.catalogue, context.config);
    let mut deck = CardDeck::default();
    let mut surface = TerminalSurface::default();

    let mut screen = render_container(&controller, &mut deck, &mut surface);

    if let Some(id) = goto {
        if !context.catalogue.contains(id) {
            anyhow::bail!("Procedure {id} not found");
        }
        controller.navigate_to(id);
        screen = render_container(&controller, &mut deck, &mut surface);
        controller.rendered(&mut surface);
    }

    Ok((screen, controller.close()))
}

#[cfg(test)]
mod tests {
    use procedures::Config;

    use super::*;

    fn context(config: &Config) -> Context<'_> {
        Context {
            catalogue: procedures::catalogue(),
            config,
        }
    }

    #[test]
    fn opening_leaves_nothing_pending() {
        let config = Config::default();
        let (screen, closed) = emergency_view(&context(&config), None).unwrap();

        assert!(screen.contains("Flight Termination"));
        assert_eq!(closed, Closed::default());
    }

    #[test]
    fn closing_after_goto_cancels_the_highlight() {
        let config = Config::default();
        let id: ProcedureId = "E1".parse().unwrap();

        let (_, closed) = emergency_view(&context(&config), Some(&id)).unwrap();

        assert!(closed.highlight_clear);
        assert!(!closed.scroll);
    }

    #[test]
    fn unknown_goto_is_an_error() {
        let config = Config::default();
        let id: ProcedureId = "X9".parse().unwrap();

        assert!(emergency_view(&context(&config), Some(&id)).is_err());
    }
}
