//! The player's four card piles.
//!
//! Every card instance the player owns is in exactly one of deck, hand,
//! discard or exhaust. `CardPiles` tracks both the location of each card and
//! the order within each pile; the two views are always updated together so
//! the partition invariant holds after every call.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::rng::GameRng;

/// One of the player's piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Deck,
    Hand,
    Discard,
    Exhaust,
}

impl Pile {
    pub const ALL: [Pile; 4] = [Pile::Deck, Pile::Hand, Pile::Discard, Pile::Exhaust];

    const fn index(self) -> usize {
        match self {
            Pile::Deck => 0,
            Pile::Hand => 1,
            Pile::Discard => 2,
            Pile::Exhaust => 3,
        }
    }
}

/// Where to insert a card in a pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilePosition {
    /// End of the pile. For the deck this is the next card drawn.
    #[default]
    Top,
    /// Start of the pile.
    Bottom,
}

/// Outcome of drawing a single card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Draw {
    /// The card went to hand.
    ToHand(EntityId),
    /// Hand was full; the card went to discard instead.
    Overflowed(EntityId),
}

impl Draw {
    #[must_use]
    pub fn card(self) -> EntityId {
        match self {
            Draw::ToHand(card) | Draw::Overflowed(card) => card,
        }
    }
}

/// Read-only copy of every pile, in pile order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSnapshot {
    pub deck: Vec<EntityId>,
    pub hand: Vec<EntityId>,
    pub discard: Vec<EntityId>,
    pub exhaust: Vec<EntityId>,
}

impl PileSnapshot {
    /// Total cards across all four piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.exhaust.len()
    }
}

/// Location and order tracking for the player's cards.
///
/// ```
/// use card_battler::core::{EntityId, GameRng};
/// use card_battler::zones::{CardPiles, Draw, Pile, PilePosition};
///
/// let mut piles = CardPiles::new();
/// piles.add(EntityId(10), Pile::Deck, PilePosition::Top);
/// piles.add(EntityId(11), Pile::Deck, PilePosition::Top);
///
/// let mut rng = GameRng::new(1);
/// assert_eq!(piles.draw(&mut rng, 10), Some(Draw::ToHand(EntityId(11))));
/// assert_eq!(piles.location(EntityId(11)), Some(Pile::Hand));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardPiles {
    locations: FxHashMap<EntityId, Pile>,
    order: [Vec<EntityId>; 4],
}

impl CardPiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a card. Returns false if the card is already tracked.
    pub fn add(&mut self, card: EntityId, pile: Pile, position: PilePosition) -> bool {
        if self.locations.contains_key(&card) {
            return false;
        }
        self.locations.insert(card, pile);
        self.insert_ordered(card, pile, position);
        true
    }

    /// Move a card between piles. Returns the pile it left, or `None` if the
    /// card is not tracked.
    pub fn move_to(&mut self, card: EntityId, pile: Pile, position: PilePosition) -> Option<Pile> {
        let old = self.locations.get(&card).copied()?;
        if old == pile {
            return Some(old);
        }
        self.order[old.index()].retain(|&c| c != card);
        self.locations.insert(card, pile);
        self.insert_ordered(card, pile, position);
        Some(old)
    }

    /// Stop tracking a card entirely (explicit removal effects only).
    pub fn remove(&mut self, card: EntityId) -> Option<Pile> {
        let pile = self.locations.remove(&card)?;
        self.order[pile.index()].retain(|&c| c != card);
        Some(pile)
    }

    fn insert_ordered(&mut self, card: EntityId, pile: Pile, position: PilePosition) {
        let order = &mut self.order[pile.index()];
        match position {
            PilePosition::Top => order.push(card),
            PilePosition::Bottom => order.insert(0, card),
        }
    }

    #[must_use]
    pub fn location(&self, card: EntityId) -> Option<Pile> {
        self.locations.get(&card).copied()
    }

    #[must_use]
    pub fn contains(&self, card: EntityId) -> bool {
        self.locations.contains_key(&card)
    }

    /// Cards in a pile, bottom first.
    #[must_use]
    pub fn cards(&self, pile: Pile) -> &[EntityId] {
        &self.order[pile.index()]
    }

    #[must_use]
    pub fn len(&self, pile: Pile) -> usize {
        self.order[pile.index()].len()
    }

    /// Cards tracked across all piles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.locations.len()
    }

    /// Shuffle one pile in place.
    pub fn shuffle(&mut self, pile: Pile, rng: &mut GameRng) {
        rng.shuffle(&mut self.order[pile.index()]);
    }

    /// Move the whole discard pile into the deck and shuffle it.
    ///
    /// Returns how many cards moved.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) -> usize {
        let discard = std::mem::take(&mut self.order[Pile::Discard.index()]);
        let moved = discard.len();
        for &card in &discard {
            self.locations.insert(card, Pile::Deck);
        }
        self.order[Pile::Deck.index()].extend(discard);
        self.shuffle(Pile::Deck, rng);
        moved
    }

    /// Draw the top card of the deck.
    ///
    /// An empty deck is refilled from the discard pile first. A hand already
    /// holding `max_hand` cards sends the drawn card to discard. Returns
    /// `None` when both deck and discard are empty.
    pub fn draw(&mut self, rng: &mut GameRng, max_hand: usize) -> Option<Draw> {
        if self.len(Pile::Deck) == 0 && self.reshuffle_discard(rng) == 0 {
            return None;
        }
        let card = *self.order[Pile::Deck.index()].last()?;
        if self.len(Pile::Hand) >= max_hand {
            self.move_to(card, Pile::Discard, PilePosition::Top);
            Some(Draw::Overflowed(card))
        } else {
            self.move_to(card, Pile::Hand, PilePosition::Top);
            Some(Draw::ToHand(card))
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PileSnapshot {
        PileSnapshot {
            deck: self.cards(Pile::Deck).to_vec(),
            hand: self.cards(Pile::Hand).to_vec(),
            discard: self.cards(Pile::Discard).to_vec(),
            exhaust: self.cards(Pile::Exhaust).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_of(n: u32) -> CardPiles {
        let mut piles = CardPiles::new();
        for i in 0..n {
            piles.add(EntityId(100 + i), Pile::Deck, PilePosition::Top);
        }
        piles
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut piles = CardPiles::new();
        assert!(piles.add(EntityId(1), Pile::Hand, PilePosition::Top));
        assert!(!piles.add(EntityId(1), Pile::Deck, PilePosition::Top));
        assert_eq!(piles.location(EntityId(1)), Some(Pile::Hand));
        assert_eq!(piles.total(), 1);
    }

    #[test]
    fn test_positions() {
        let mut piles = CardPiles::new();
        piles.add(EntityId(1), Pile::Deck, PilePosition::Top);
        piles.add(EntityId(2), Pile::Deck, PilePosition::Bottom);
        piles.add(EntityId(3), Pile::Deck, PilePosition::Top);
        assert_eq!(piles.cards(Pile::Deck), &[EntityId(2), EntityId(1), EntityId(3)]);
    }

    #[test]
    fn test_move_and_remove() {
        let mut piles = deck_of(2);
        assert_eq!(piles.move_to(EntityId(100), Pile::Exhaust, PilePosition::Top), Some(Pile::Deck));
        assert_eq!(piles.len(Pile::Exhaust), 1);
        assert_eq!(piles.move_to(EntityId(999), Pile::Hand, PilePosition::Top), None);

        assert_eq!(piles.remove(EntityId(100)), Some(Pile::Exhaust));
        assert!(!piles.contains(EntityId(100)));
        assert_eq!(piles.total(), 1);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut piles = deck_of(3);
        for card in [EntityId(100), EntityId(101), EntityId(102)] {
            piles.move_to(card, Pile::Discard, PilePosition::Top);
        }
        let mut rng = GameRng::new(3);

        let drawn = piles.draw(&mut rng, 10).unwrap();
        assert!(matches!(drawn, Draw::ToHand(_)));
        assert_eq!(piles.len(Pile::Discard), 0);
        assert_eq!(piles.len(Pile::Deck), 2);
        assert_eq!(piles.total(), 3);
    }

    #[test]
    fn test_draw_overflow_goes_to_discard() {
        let mut piles = deck_of(3);
        let mut rng = GameRng::new(3);

        assert!(matches!(piles.draw(&mut rng, 1), Some(Draw::ToHand(_))));
        let overflow = piles.draw(&mut rng, 1).unwrap();
        assert!(matches!(overflow, Draw::Overflowed(_)));
        assert_eq!(piles.location(overflow.card()), Some(Pile::Discard));
    }

    #[test]
    fn test_draw_from_nothing() {
        let mut piles = CardPiles::new();
        piles.add(EntityId(1), Pile::Exhaust, PilePosition::Top);
        let mut rng = GameRng::new(3);
        assert_eq!(piles.draw(&mut rng, 10), None);
    }

    #[test]
    fn test_snapshot() {
        let mut piles = deck_of(2);
        piles.move_to(EntityId(101), Pile::Hand, PilePosition::Top);

        let snapshot = piles.snapshot();
        assert_eq!(snapshot.deck, vec![EntityId(100)]);
        assert_eq!(snapshot.hand, vec![EntityId(101)]);
        assert_eq!(snapshot.total(), 2);
    }
}
