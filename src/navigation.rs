//! Navigation and disclosure state for presentation containers.
//!
//! Each container owns one [`NavigationController`] reading from the shared
//! catalogue. The controller decides which procedure is expanded, which is
//! highlighted and which category groups are collapsed, and asks the
//! rendering layer, through [`Surface`], to scroll the target into view.

mod controller;
pub use controller::{Closed, ContainerKind, NavigationController, Section};

mod disclosure;
pub use disclosure::{CardDeck, ExpansionRequest};

mod surface;
pub use surface::{ScrollBehavior, ScrollBlock, ScrollOptions, Surface};
