//! The cross-reference navigation state machine.
//!
//! Time is a logical clock owned by the controller. The host event loop
//! reports the end of each rendering pass with
//! [`NavigationController::rendered`] and the passage of time with
//! [`NavigationController::advance`]; every timer fires from one of those two
//! calls, never on its own.

use std::{collections::BTreeSet, time::Duration};

use tracing::{debug, instrument, trace, warn};

use super::{disclosure::ExpansionRequest, ScrollOptions, Surface};
use crate::{Catalogue, Category, Config, Procedure, ProcedureConditional, ProcedureId};

/// Categories shown, flattened, by the emergency container.
const EMERGENCY_CATEGORIES: [Category; 2] = [Category::Emergency, Category::Erp];

/// The kind of presentation container a controller serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Full-screen emergency view. One scroll region, no category groups.
    Emergency,
    /// General browser with collapsible category groups.
    Browser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Flat,
    Grouped { collapsed: BTreeSet<Category> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingScroll {
    target: ProcedureId,
    stage: ScrollStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollStage {
    /// Waiting for the rendering pass that applies the new state.
    /// `reveal` is set when a category group was expanded to show the target.
    AwaitingRender { reveal: bool },
    /// Due at the given instant.
    Scheduled { at: Duration },
}

/// A group of procedures as a container presents it.
#[derive(Debug, Clone)]
pub struct Section<'c> {
    /// The category this section groups, or `None` for the flat emergency
    /// view.
    pub category: Option<Category>,
    /// Whether the group is collapsed.
    pub collapsed: bool,
    /// Every procedure in the group, in catalogue order.
    pub procedures: Vec<&'c Procedure>,
}

impl<'c> Section<'c> {
    /// The procedures that should be rendered: none while collapsed.
    #[must_use]
    pub fn visible(&self) -> &[&'c Procedure] {
        if self.collapsed {
            &[]
        } else {
            &self.procedures
        }
    }
}

/// What closing a container cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct Closed {
    /// A highlight-clear timer was pending.
    pub highlight_clear: bool,
    /// A scroll was pending.
    pub scroll: bool,
}

/// Per-container navigation and disclosure state.
///
/// Created when a presentation container mounts and consumed by
/// [`NavigationController::close`] when it unmounts.
#[derive(Debug, Clone)]
pub struct NavigationController<'c> {
    catalogue: &'c Catalogue,
    layout: Layout,

    expanded: Option<ProcedureId>,
    highlighted: Option<ProcedureId>,
    /// Incremented on every successful navigation.
    request: u64,

    highlight: Duration,
    reveal_delay: Duration,

    now: Duration,
    scroll: Option<PendingScroll>,
    /// Instant at which `highlighted` is cleared.
    highlight_clear: Option<Duration>,
}

impl<'c> NavigationController<'c> {
    /// Mounts a controller for the full-screen emergency container.
    ///
    /// The configured default procedure (flight termination) starts expanded.
    /// An unknown default is logged and leaves nothing expanded.
    #[must_use]
    pub fn emergency(catalogue: &'c Catalogue, config: &Config) -> Self {
        let expanded = catalogue
            .get(config.emergency_default())
            .map(|procedure| procedure.id().clone());

        if expanded.is_none() {
            warn!(
                id = config.emergency_default(),
                "emergency default procedure not found in catalogue"
            );
        }

        Self::new(catalogue, config, Layout::Flat, expanded)
    }

    /// Mounts a controller for the general browsing container.
    ///
    /// Nothing starts expanded; the configured categories start collapsed.
    #[must_use]
    pub fn browser(catalogue: &'c Catalogue, config: &Config) -> Self {
        let layout = Layout::Grouped {
            collapsed: config.collapsed_categories().clone(),
        };
        Self::new(catalogue, config, layout, None)
    }

    fn new(
        catalogue: &'c Catalogue,
        config: &Config,
        layout: Layout,
        expanded: Option<ProcedureId>,
    ) -> Self {
        Self {
            catalogue,
            layout,
            expanded,
            highlighted: None,
            request: 0,
            highlight: config.highlight(),
            reveal_delay: config.reveal_delay(),
            now: Duration::ZERO,
            scroll: None,
            highlight_clear: None,
        }
    }

    /// Jumps to a procedure.
    ///
    /// Expands the target's category group if it is collapsed, makes the
    /// target the expanded and highlighted procedure, schedules a scroll for
    /// after the next rendering pass, and (re)starts the highlight timer. All
    /// state is updated before this returns.
    ///
    /// Unknown identifiers are ignored.
    #[instrument(level = "debug", skip(self), fields(now = ?self.now))]
    pub fn navigate_to(&mut self, id: &str) {
        let Some(procedure) = self.catalogue.get(id) else {
            debug!("unknown procedure, ignoring");
            return;
        };
        let target = procedure.id().clone();

        let revealed = match &mut self.layout {
            Layout::Grouped { collapsed } => collapsed.remove(&procedure.category()),
            Layout::Flat => false,
        };
        if revealed {
            debug!(category = %procedure.category(), "expanded category");
        }

        // A group revealed for a superseded scroll may still be laying out.
        let reveal = revealed
            || matches!(
                self.scroll,
                Some(PendingScroll {
                    stage: ScrollStage::AwaitingRender { reveal: true }
                        | ScrollStage::Scheduled { .. },
                    ..
                })
            );

        if self.highlight_clear.is_some() {
            trace!("superseding pending highlight clear");
        }

        self.expanded = Some(target.clone());
        self.highlighted = Some(target.clone());
        self.request += 1;
        self.scroll = Some(PendingScroll {
            target,
            stage: ScrollStage::AwaitingRender { reveal },
        });
        self.highlight_clear = Some(self.now.saturating_add(self.highlight));
    }

    /// Follows a conditional's cross-reference, if it has one.
    pub fn activate(&mut self, conditional: &ProcedureConditional) {
        if let Some(target) = conditional.reference_id() {
            self.navigate_to(target);
        }
    }

    /// Flips whether a category group is collapsed.
    ///
    /// The emergency container has no category groups; there this does
    /// nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_category(&mut self, category: Category) {
        match &mut self.layout {
            Layout::Grouped { collapsed } => {
                if !collapsed.remove(&category) {
                    collapsed.insert(category);
                }
            }
            Layout::Flat => debug!("container has no category groups"),
        }
    }

    /// Signals that a rendering pass has completed.
    ///
    /// A scroll waiting on this pass is performed now, or, if a category
    /// group was expanded to reveal the target, scheduled after the reveal
    /// delay.
    pub fn rendered<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let Some(PendingScroll {
            target,
            stage: ScrollStage::AwaitingRender { reveal },
        }) = self.scroll.take_if(|scroll| {
            matches!(scroll.stage, ScrollStage::AwaitingRender { .. })
        })
        else {
            return;
        };

        if reveal {
            let at = self.now.saturating_add(self.reveal_delay);
            trace!(%target, ?at, "scroll deferred until revealed content lays out");
            self.scroll = Some(PendingScroll {
                target,
                stage: ScrollStage::Scheduled { at },
            });
        } else {
            scroll_to(&target, surface);
        }
    }

    /// Advances the logical clock, firing every timer that falls due, in
    /// deadline order.
    pub fn advance<S: Surface + ?Sized>(&mut self, elapsed: Duration, surface: &mut S) {
        let until = self.now.saturating_add(elapsed);

        while let Some(timer) = self.next_timer().filter(|timer| timer.at() <= until) {
            self.now = timer.at();
            match timer {
                Timer::Scroll(_) => {
                    if let Some(scroll) = self.scroll.take() {
                        scroll_to(&scroll.target, surface);
                    }
                }
                Timer::HighlightClear(_) => {
                    trace!(highlighted = ?self.highlighted, "highlight expired");
                    self.highlighted = None;
                    self.highlight_clear = None;
                }
            }
        }

        self.now = until;
    }

    /// Time until the next timer falls due, if any is scheduled.
    ///
    /// A scroll still waiting for a rendering pass is not a timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_timer().map(|timer| timer.at().saturating_sub(self.now))
    }

    /// Unmounts the container, cancelling pending timers.
    #[instrument(level = "debug", skip(self))]
    pub fn close(self) -> Closed {
        let closed = Closed {
            highlight_clear: self.highlight_clear.is_some(),
            scroll: self.scroll.is_some(),
        };
        debug!(?closed, "container closed");
        closed
    }

    /// The kind of container this controller serves.
    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        match self.layout {
            Layout::Flat => ContainerKind::Emergency,
            Layout::Grouped { .. } => ContainerKind::Browser,
        }
    }

    /// The catalogue this controller reads from.
    #[must_use]
    pub const fn catalogue(&self) -> &'c Catalogue {
        self.catalogue
    }

    /// The procedure most recently requested to be expanded.
    #[must_use]
    pub const fn expanded(&self) -> Option<&ProcedureId> {
        self.expanded.as_ref()
    }

    /// The procedure currently highlighted.
    #[must_use]
    pub const fn highlighted(&self) -> Option<&ProcedureId> {
        self.highlighted.as_ref()
    }

    /// Whether this procedure is currently highlighted.
    #[must_use]
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.as_ref().is_some_and(|h| h.as_str() == id)
    }

    /// The expansion request cards seed their open state from.
    #[must_use]
    pub const fn expansion_request(&self) -> ExpansionRequest<'_> {
        ExpansionRequest {
            target: self.expanded.as_ref(),
            serial: self.request,
        }
    }

    /// The collapsed category groups, or `None` in a container without
    /// category groups.
    #[must_use]
    pub const fn collapsed_categories(&self) -> Option<&BTreeSet<Category>> {
        match &self.layout {
            Layout::Grouped { collapsed } => Some(collapsed),
            Layout::Flat => None,
        }
    }

    /// Whether a category group is collapsed. Always `false` in a container
    /// without category groups.
    #[must_use]
    pub fn is_collapsed(&self, category: Category) -> bool {
        self.collapsed_categories()
            .is_some_and(|collapsed| collapsed.contains(&category))
    }

    /// The container's content, grouped as it should be presented.
    #[must_use]
    pub fn sections(&self) -> Vec<Section<'c>> {
        let catalogue = self.catalogue;
        match &self.layout {
            Layout::Grouped { collapsed } => Category::ALL
                .into_iter()
                .map(|category| Section {
                    category: Some(category),
                    collapsed: collapsed.contains(&category),
                    procedures: catalogue.by_category(category).collect(),
                })
                .collect(),
            Layout::Flat => vec![Section {
                category: None,
                collapsed: false,
                procedures: EMERGENCY_CATEGORIES
                    .into_iter()
                    .flat_map(|category| catalogue.by_category(category))
                    .collect(),
            }],
        }
    }

    /// Elapsed logical time since the container was mounted.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    fn next_timer(&self) -> Option<Timer> {
        let scroll = match self.scroll {
            Some(PendingScroll {
                stage: ScrollStage::Scheduled { at },
                ..
            }) => Some(Timer::Scroll(at)),
            _ => None,
        };
        let clear = self.highlight_clear.map(Timer::HighlightClear);

        // On a tie the scroll fires first.
        match (scroll, clear) {
            (Some(s), Some(c)) => Some(if c.at() < s.at() { c } else { s }),
            (s, c) => s.or(c),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    Scroll(Duration),
    HighlightClear(Duration),
}

impl Timer {
    const fn at(self) -> Duration {
        match self {
            Self::Scroll(at) | Self::HighlightClear(at) => at,
        }
    }
}

fn scroll_to<S: Surface + ?Sized>(target: &ProcedureId, surface: &mut S) {
    if surface.contains(target) {
        trace!(%target, "scrolling into view");
        surface.scroll_into_view(target, ScrollOptions::CENTERED);
    } else {
        debug!(%target, "scroll target not rendered, skipping");
    }
}
