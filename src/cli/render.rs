//! Terminal rendering of procedure cards and containers.

use std::{collections::HashSet, fmt::Write};

use procedures::{
    navigation::{ScrollOptions, Section},
    CardDeck, Catalogue, NavigationController, Procedure, ProcedureId, Step, Surface,
};

use super::terminal::{text_width, Colorize};

/// The set of cards on screen, and where the last scroll went.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    rendered: HashSet<ProcedureId>,
    scrolled_to: Option<ProcedureId>,
}

impl TerminalSurface {
    /// Records the cards the latest rendering pass put on screen.
    pub fn mount(&mut self, sections: &[Section]) {
        self.rendered = sections
            .iter()
            .flat_map(Section::visible)
            .map(|procedure| procedure.id().clone())
            .collect();
    }

    pub const fn scrolled_to(&self) -> Option<&ProcedureId> {
        self.scrolled_to.as_ref()
    }
}

impl Surface for TerminalSurface {
    fn contains(&self, id: &ProcedureId) -> bool {
        self.rendered.contains(id)
    }

    fn scroll_into_view(&mut self, id: &ProcedureId, _options: ScrollOptions) {
        self.scrolled_to = Some(id.clone());
    }
}

/// One rendering pass of a container: mounts the visible cards on the surface
/// and the deck, and returns the screen.
pub fn render_container(
    controller: &NavigationController,
    deck: &mut CardDeck,
    surface: &mut TerminalSurface,
) -> String {
    let sections = controller.sections();
    surface.mount(&sections);
    deck.sync(
        sections
            .iter()
            .flat_map(Section::visible)
            .map(|procedure| procedure.id()),
        controller.expansion_request(),
    );

    let mut out = String::new();
    for section in &sections {
        if let Some(category) = section.category {
            let style = category.style();
            let marker = if section.collapsed { "▸" } else { "▾" };
            let header = format!(
                "{marker} {} {} ({})",
                style.icon.glyph(),
                style.label,
                section.procedures.len()
            );
            let _ = writeln!(out, "{}", header.tone(style.tone).strong());
        }

        for procedure in section.visible() {
            let id = procedure.id();
            out.push_str(&render_card(
                procedure,
                controller.catalogue(),
                deck.is_open(id),
                controller.is_highlighted(id),
            ));
        }
    }
    out
}

/// Renders a procedure card: a header line, and the body when open.
pub fn render_card(
    procedure: &Procedure,
    catalogue: &Catalogue,
    open: bool,
    highlighted: bool,
) -> String {
    let style = procedure.category().style();
    let mut out = String::new();

    let marker = if open { "▾" } else { "▸" };
    let header = format!(
        "{marker} {:<8} {}  [{}]",
        procedure.id(),
        procedure.title(),
        style.short_label
    );
    let header = if highlighted {
        header.highlight()
    } else {
        header.tone(style.tone)
    };
    let _ = writeln!(out, "  {header}");

    if !open {
        return out;
    }

    if !procedure.description().is_empty() {
        let _ = writeln!(out, "      {}", procedure.description());
    }

    for note in procedure.general_notes() {
        let _ = writeln!(out, "      {} {note}", "ℹ".dim());
    }

    for action in procedure.actions() {
        let _ = writeln!(out, "\n      {}", action.role.label().strong());
        for (n, step) in action.steps.iter().enumerate() {
            let _ = writeln!(out, "        {}. {}", n + 1, render_step(step));
        }
    }

    if !procedure.conditionals().is_empty() {
        let _ = writeln!(out, "\n      {}", "Conditions".strong());
        for (n, conditional) in procedure.conditionals().iter().enumerate() {
            let reference = conditional
                .reference_id()
                .map(|target| {
                    let label = catalogue
                        .get(target)
                        .map_or("unknown procedure", Procedure::short_title);
                    format!(" [see {target}: {label}]").tone(
                        catalogue
                            .get(target)
                            .map_or(style.tone, |p| p.category().style().tone),
                    )
                })
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "        {}. IF {} → {}{reference}",
                n + 1,
                conditional.condition,
                conditional.action
            );
        }
    }

    if !procedure.notes().is_empty() {
        let _ = writeln!(out, "\n      {}", "Notes".strong());
        for note in procedure.notes() {
            let _ = writeln!(out, "        • {note}");
        }
    }

    let _ = writeln!(out, "  {}", "─".repeat(text_width().saturating_sub(4)).dim());
    out
}

fn render_step(step: &Step) -> String {
    match step {
        Step::Plain(text) => text.clone(),
        Step::CallOut(text) => format!("📢 {}", text.warning().strong()),
    }
}
