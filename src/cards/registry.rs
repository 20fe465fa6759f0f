//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition an encounter may
//! instantiate. It provides fast lookup by `CardId` and supports iteration.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardKind};

/// Registration rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{0} is already registered")]
    Duplicate(CardId),
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use card_battler::cards::{CardDefinition, CardId, CardRegistry};
/// use card_battler::effects::{AttackEffect, CardEffect};
///
/// let mut registry = CardRegistry::new();
///
/// let strike = CardDefinition::new(
///     CardId::new(1),
///     "Strike",
///     1,
///     CardEffect::Attack(AttackEffect::Strike { damage: 6 }),
/// );
/// registry.register(strike).unwrap();
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Strike");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition. Ids must be unique.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), RegistryError> {
        if self.cards.contains_key(&card.id) {
            return Err(RegistryError::Duplicate(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards of one kind.
    pub fn find_by_kind(&self, kind: CardKind) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.kind() == kind)
    }
}

impl FromIterator<CardDefinition> for CardRegistry {
    /// Later duplicates are ignored.
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            let _ = registry.register(card);
        }
        registry
    }
}
