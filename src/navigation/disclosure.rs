//! Per-card open/closed state.
//!
//! A controller's expanded procedure is a request, not an accordion. Each
//! card keeps its own open flag, seeded from the request when the card
//! mounts and re-seeded when the request concerning it changes. Between
//! re-seeds the operator can open and close any number of cards freely.

use std::collections::HashMap;

use tracing::trace;

use crate::ProcedureId;

/// The expansion request cards seed their open state from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionRequest<'a> {
    /// The procedure requested to be open, if any.
    pub target: Option<&'a ProcedureId>,
    /// Incremented on every navigation, so that navigating again to the same
    /// procedure counts as a new request.
    pub serial: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CardDisclosure {
    open: bool,
    /// Whether the card was the request's target when last seeded.
    seed: bool,
    /// The request serial the card was last seeded from.
    serial: u64,
}

/// Open/closed state for the cards a container currently renders.
#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    cards: HashMap<ProcedureId, CardDisclosure>,
}

impl CardDeck {
    /// Reconciles the deck with the cards rendered in this pass.
    ///
    /// - A newly mounted card opens if it is the request's target.
    /// - A card whose target status flipped takes the new status.
    /// - The target of a newer request reopens, even if it was closed by hand.
    /// - Any other card keeps its state.
    ///
    /// Cards absent from `rendered` are unmounted and forget their state.
    pub fn sync<'a>(
        &mut self,
        rendered: impl IntoIterator<Item = &'a ProcedureId>,
        request: ExpansionRequest<'_>,
    ) {
        let mut mounted = HashMap::with_capacity(self.cards.len());

        for id in rendered {
            let seed = request.target == Some(id);
            let card = match self.cards.remove(id) {
                None => CardDisclosure {
                    open: seed,
                    seed,
                    serial: request.serial,
                },
                Some(card) if card.seed != seed || (seed && card.serial != request.serial) => {
                    trace!(%id, open = seed, "re-seeding card");
                    CardDisclosure {
                        open: seed,
                        seed,
                        serial: request.serial,
                    }
                }
                Some(card) => card,
            };
            mounted.insert(id.clone(), card);
        }

        self.cards = mounted;
    }

    /// Flips a mounted card open or closed, returning its new state.
    ///
    /// Returns `None` if the card is not mounted.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let card = self.cards.get_mut(id)?;
        card.open = !card.open;
        Some(card.open)
    }

    /// Whether a card is open. Unmounted cards are closed.
    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.cards.get(id).is_some_and(|card| card.open)
    }

    /// Identifiers of every open card.
    pub fn open(&self) -> impl Iterator<Item = &ProcedureId> {
        self.cards
            .iter()
            .filter(|(_, card)| card.open)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ProcedureId> {
        raw.iter().map(|id| id.parse().unwrap()).collect()
    }

    fn request(target: Option<&ProcedureId>, serial: u64) -> ExpansionRequest<'_> {
        ExpansionRequest { target, serial }
    }

    #[test]
    fn mount_seeds_from_request() {
        let cards = ids(&["E1", "E5"]);
        let mut deck = CardDeck::default();

        deck.sync(&cards, request(Some(&cards[1]), 0));

        assert!(!deck.is_open("E1"));
        assert!(deck.is_open("E5"));
    }

    #[test]
    fn cards_open_independently() {
        let cards = ids(&["E1", "E5"]);
        let mut deck = CardDeck::default();
        deck.sync(&cards, request(Some(&cards[1]), 0));

        assert_eq!(deck.toggle("E1"), Some(true));
        deck.sync(&cards, request(Some(&cards[1]), 0));

        assert!(deck.is_open("E1"));
        assert!(deck.is_open("E5"));
        assert_eq!(deck.open().count(), 2);
    }

    #[test]
    fn new_target_reseeds_old_and_new() {
        let cards = ids(&["C1", "E1", "N1"]);
        let mut deck = CardDeck::default();
        deck.sync(&cards, request(Some(&cards[0]), 1));
        deck.toggle("N1");

        deck.sync(&cards, request(Some(&cards[1]), 2));

        assert!(!deck.is_open("C1"));
        assert!(deck.is_open("E1"));
        assert!(deck.is_open("N1"), "untargeted cards keep their state");
    }

    #[test]
    fn renavigating_reopens_a_closed_target() {
        let cards = ids(&["E1"]);
        let mut deck = CardDeck::default();
        deck.sync(&cards, request(Some(&cards[0]), 1));
        assert_eq!(deck.toggle("E1"), Some(false));

        deck.sync(&cards, request(Some(&cards[0]), 1));
        assert!(!deck.is_open("E1"), "same request does not re-seed");

        deck.sync(&cards, request(Some(&cards[0]), 2));
        assert!(deck.is_open("E1"));
    }

    #[test]
    fn unmounted_cards_forget_state() {
        let cards = ids(&["N1", "N2"]);
        let mut deck = CardDeck::default();
        deck.sync(&cards, request(None, 0));
        deck.toggle("N2");

        deck.sync(&cards[..1], request(None, 0));
        assert!(!deck.is_open("N2"));
        assert_eq!(deck.toggle("N2"), None);

        deck.sync(&cards, request(None, 0));
        assert!(!deck.is_open("N2"));
    }
}
