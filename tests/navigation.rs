//! End-to-end navigation over the built-in catalogue.

#![allow(missing_docs)]

use std::{collections::HashSet, time::Duration};

use procedures::{
    navigation::{ContainerKind, ScrollOptions},
    CardDeck, Category, Config, NavigationController, ProcedureId, Surface,
};
use test_case::test_case;

/// A rendering layer that mounts whatever the controller says is visible and
/// records every scroll.
#[derive(Debug, Default)]
struct Viewport {
    mounted: HashSet<ProcedureId>,
    scrolls: Vec<(ProcedureId, ScrollOptions)>,
}

impl Viewport {
    fn render(&mut self, controller: &NavigationController) {
        self.mounted = controller
            .sections()
            .iter()
            .flat_map(|section| section.visible().iter().map(|p| p.id().clone()))
            .collect();
    }

    fn last_scroll(&self) -> Option<&str> {
        self.scrolls.last().map(|(id, _)| id.as_str())
    }
}

impl Surface for Viewport {
    fn contains(&self, id: &ProcedureId) -> bool {
        self.mounted.contains(id)
    }

    fn scroll_into_view(&mut self, id: &ProcedureId, options: ScrollOptions) {
        self.scrolls.push((id.clone(), options));
    }
}

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn browser() -> (NavigationController<'static>, Viewport) {
    let controller = NavigationController::browser(procedures::catalogue(), &Config::default());
    let mut viewport = Viewport::default();
    viewport.render(&controller);
    (controller, viewport)
}

fn highlighted<'a>(controller: &'a NavigationController) -> Option<&'a str> {
    controller.highlighted().map(ProcedureId::as_str)
}

fn expanded<'a>(controller: &'a NavigationController) -> Option<&'a str> {
    controller.expanded().map(ProcedureId::as_str)
}

#[test]
fn identifiers_are_unique_and_references_resolve() {
    let catalogue = procedures::catalogue();

    let ids: HashSet<_> = catalogue.iter().map(|p| p.id()).collect();
    assert_eq!(ids.len(), catalogue.len());
    assert!(catalogue.check_integrity().is_empty());

    for procedure in catalogue.iter() {
        for target in procedure.references() {
            assert!(
                catalogue.contains(target),
                "{} references missing {target}",
                procedure.id()
            );
        }
    }
}

#[test]
fn categories_partition_the_catalogue() {
    let catalogue = procedures::catalogue();

    let total: usize = Category::ALL
        .iter()
        .map(|&category| catalogue.by_category(category).count())
        .sum();
    assert_eq!(total, catalogue.len());

    for category in Category::ALL {
        let first: Vec<_> = catalogue.by_category(category).map(|p| p.id()).collect();
        let second: Vec<_> = catalogue.by_category(category).map(|p| p.id()).collect();
        assert_eq!(first, second);
        assert!(
            catalogue
                .by_category(category)
                .all(|p| p.category() == category)
        );
    }
}

#[test]
fn browser_starts_with_emergency_groups_collapsed() {
    let (controller, viewport) = browser();

    assert_eq!(controller.kind(), ContainerKind::Browser);
    assert!(!controller.is_collapsed(Category::Normal));
    assert!(!controller.is_collapsed(Category::Contingency));
    assert!(controller.is_collapsed(Category::Emergency));
    assert!(controller.is_collapsed(Category::Erp));
    assert_eq!(expanded(&controller), None);
    assert!(viewport.contains(&"N1".parse().unwrap()));
    assert!(!viewport.contains(&"E5".parse().unwrap()));
}

#[test]
fn emergency_view_opens_on_flight_termination() {
    let catalogue = procedures::catalogue();
    let mut controller = NavigationController::emergency(catalogue, &Config::default());

    assert_eq!(controller.kind(), ContainerKind::Emergency);
    assert_eq!(expanded(&controller), Some("E5"));
    assert_eq!(highlighted(&controller), None);
    assert_eq!(controller.next_deadline(), None);

    controller.toggle_category(Category::Emergency);
    let sections = controller.sections();
    assert_eq!(sections.len(), 1);
    assert!(!sections[0].collapsed);
    assert!(sections[0]
        .procedures
        .iter()
        .all(|p| matches!(p.category(), Category::Emergency | Category::Erp)));
}

#[test_case("X9"; "unknown identifier")]
#[test_case(""; "empty identifier")]
fn unknown_target_changes_nothing(id: &str) {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to(id);
    controller.rendered(&mut viewport);
    controller.advance(ms(5000), &mut viewport);

    assert_eq!(expanded(&controller), None);
    assert_eq!(highlighted(&controller), None);
    assert!(controller.is_collapsed(Category::Emergency));
    assert!(viewport.scrolls.is_empty());
}

#[test]
fn navigating_within_an_open_group_scrolls_after_render() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("C4.1");
    assert_eq!(expanded(&controller), Some("C4.1"));
    assert_eq!(highlighted(&controller), Some("C4.1"));
    assert!(viewport.scrolls.is_empty(), "no scroll before the render pass");

    viewport.render(&controller);
    controller.rendered(&mut viewport);

    assert_eq!(
        viewport.scrolls,
        vec![("C4.1".parse().unwrap(), ScrollOptions::CENTERED)]
    );
}

#[test]
fn navigating_into_a_collapsed_group_reveals_it_first() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("E1");
    assert!(!controller.is_collapsed(Category::Emergency));
    assert!(controller.is_collapsed(Category::Erp));

    viewport.render(&controller);
    controller.rendered(&mut viewport);
    assert!(viewport.scrolls.is_empty());

    controller.advance(ms(99), &mut viewport);
    assert!(viewport.scrolls.is_empty());

    controller.advance(ms(1), &mut viewport);
    assert_eq!(viewport.last_scroll(), Some("E1"));
}

#[test]
fn highlight_expires_after_two_seconds() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("N4");
    viewport.render(&controller);
    controller.rendered(&mut viewport);

    controller.advance(ms(1999), &mut viewport);
    assert_eq!(highlighted(&controller), Some("N4"));

    controller.advance(ms(1), &mut viewport);
    assert_eq!(highlighted(&controller), None);
    assert_eq!(expanded(&controller), Some("N4"), "expansion outlives the highlight");
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn later_navigation_supersedes_the_highlight_timer() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("N2");
    viewport.render(&controller);
    controller.rendered(&mut viewport);
    controller.advance(ms(500), &mut viewport);

    controller.navigate_to("N3");
    viewport.render(&controller);
    controller.rendered(&mut viewport);

    // 2100 ms after the first navigation: the first timer would have fired.
    controller.advance(ms(1600), &mut viewport);
    assert_eq!(highlighted(&controller), Some("N3"));

    controller.advance(ms(400), &mut viewport);
    assert_eq!(highlighted(&controller), None);
    assert_eq!(viewport.last_scroll(), Some("N3"));
}

#[test]
fn renavigating_to_the_same_procedure_restarts_its_highlight() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("N2");
    viewport.render(&controller);
    controller.rendered(&mut viewport);
    controller.advance(ms(1500), &mut viewport);

    controller.navigate_to("N2");
    viewport.render(&controller);
    controller.rendered(&mut viewport);

    controller.advance(ms(600), &mut viewport);
    assert_eq!(highlighted(&controller), Some("N2"));

    controller.advance(ms(1400), &mut viewport);
    assert_eq!(highlighted(&controller), None);
    assert_eq!(viewport.scrolls.len(), 2);
}

#[test]
fn second_target_in_a_just_revealed_group_waits_for_layout() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("E1");
    controller.navigate_to("E2");
    viewport.render(&controller);
    controller.rendered(&mut viewport);
    assert!(viewport.scrolls.is_empty());

    controller.advance(ms(99), &mut viewport);
    assert!(viewport.scrolls.is_empty());

    controller.advance(ms(1), &mut viewport);
    assert_eq!(viewport.last_scroll(), Some("E2"));
    assert_eq!(viewport.scrolls.len(), 1);
}

#[test]
fn missing_scroll_target_is_skipped() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("E2");
    // The rendering layer never mounts the revealed group.
    controller.rendered(&mut viewport);
    controller.advance(ms(100), &mut viewport);

    assert!(viewport.scrolls.is_empty());
    assert_eq!(highlighted(&controller), Some("E2"));
}

#[test]
fn closing_cancels_pending_timers() {
    let (mut controller, mut viewport) = browser();

    controller.navigate_to("ERP-FA");
    viewport.render(&controller);
    controller.rendered(&mut viewport);

    let closed = controller.close();
    assert!(closed.highlight_clear);
    assert!(closed.scroll);
    assert!(viewport.scrolls.is_empty());
}

#[test]
fn following_lost_link_into_fly_away() {
    let catalogue = procedures::catalogue();
    let (mut controller, mut viewport) = browser();
    let mut deck = CardDeck::default();

    let sync = |controller: &NavigationController, deck: &mut CardDeck| {
        let sections = controller.sections();
        deck.sync(
            sections
                .iter()
                .flat_map(|section| section.visible().iter().map(|p| p.id())),
            controller.expansion_request(),
        );
    };
    sync(&controller, &mut deck);
    assert_eq!(deck.open().count(), 0);

    let conditional = catalogue
        .get("C1")
        .unwrap()
        .conditionals()
        .iter()
        .find(|c| c.reference_id().is_some_and(|id| id == "E1"))
        .unwrap();
    controller.activate(conditional);

    assert!(!controller.is_collapsed(Category::Emergency));
    assert_eq!(expanded(&controller), Some("E1"));
    assert_eq!(highlighted(&controller), Some("E1"));

    viewport.render(&controller);
    sync(&controller, &mut deck);
    controller.rendered(&mut viewport);
    assert!(deck.is_open("E1"));

    controller.advance(ms(100), &mut viewport);
    assert_eq!(
        viewport.scrolls,
        vec![("E1".parse().unwrap(), ScrollOptions::CENTERED)]
    );

    controller.advance(ms(1899), &mut viewport);
    assert_eq!(highlighted(&controller), Some("E1"));
    controller.advance(ms(1), &mut viewport);
    assert_eq!(highlighted(&controller), None);
    assert!(deck.is_open("E1"), "highlight expiry leaves the card open");
}
