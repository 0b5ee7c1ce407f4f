use crate::ProcedureId;

/// The rendering layer, as seen by a [`NavigationController`].
///
/// [`NavigationController`]: crate::NavigationController
pub trait Surface {
    /// Whether an element for this procedure is currently rendered.
    fn contains(&self, id: &ProcedureId) -> bool;

    /// Scrolls the element for this procedure into view.
    ///
    /// Only called when [`Surface::contains`] returned `true` for the same
    /// identifier.
    fn scroll_into_view(&mut self, id: &ProcedureId, options: ScrollOptions);
}

/// How a scroll should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    /// Animation.
    pub behavior: ScrollBehavior,
    /// Vertical alignment of the target within the scroll container.
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// Smooth scroll, target vertically centred.
    pub const CENTERED: Self = Self {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Center,
    };
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Scroll animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animate to the target.
    Smooth,
    /// Jump to the target.
    Instant,
}

/// Vertical alignment of a scroll target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    /// Align to the top edge.
    Start,
    /// Centre in the container.
    Center,
    /// Align to the bottom edge.
    End,
    /// Scroll the minimum distance needed.
    Nearest,
}
