//! Card definitions - static card data.
//!
//! A `CardDefinition` is a single data-driven record: kind, cost, exhaust
//! flag, optional element and a bound effect. A fire strike and a water
//! strike are the same effect with a different element, not different types.
//!
//! Instance-specific data (which pile a copy sits in) is tracked separately
//! by `CardInstance` and the player's piles.

use serde::{Deserialize, Serialize};

use crate::board::OffsetTable;
use crate::effects::{CardEffect, TargetRequirement};
use crate::elements::Element;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Fire Strike"), not a specific
/// copy in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three card kinds. Each exposes a different capability surface to the
/// executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Skill,
    Movement,
}

/// Static card data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Energy cost.
    pub cost: u32,

    /// Goes to the exhaust pile instead of discard after play.
    #[serde(default)]
    pub exhaust: bool,

    /// Element routed through the reaction engine on every hit.
    #[serde(default)]
    pub element: Option<Element>,

    /// Offsets from the player a target may sit at. `None` reaches the
    /// whole board.
    #[serde(default)]
    pub range: Option<OffsetTable>,

    /// What the card does.
    pub effect: CardEffect,
}

impl CardDefinition {
    /// Create a new card definition.
    pub fn new(id: CardId, name: impl Into<String>, cost: u32, effect: CardEffect) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            exhaust: false,
            element: None,
            range: None,
            effect,
        }
    }

    /// Builder: exhaust on use.
    #[must_use]
    pub fn exhausting(mut self) -> Self {
        self.exhaust = true;
        self
    }

    /// Builder: attach an element.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Builder: limit where the target may be.
    #[must_use]
    pub fn with_range(mut self, range: OffsetTable) -> Self {
        self.range = Some(range);
        self
    }

    /// The card's kind, derived from its effect.
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        self.effect.kind()
    }

    #[must_use]
    pub const fn target_requirement(&self) -> TargetRequirement {
        self.effect.target_requirement()
    }
}
