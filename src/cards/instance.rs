//! Card instances - one copy of a definition in the player's deck.
//!
//! Instances are created once at deck-build time and keep their entity id for
//! the whole encounter. Which pile the copy sits in is tracked by
//! `CardPiles`, not here.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::entity::EntityId;

/// A card copy in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this copy.
    pub entity_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,
}

impl CardInstance {
    #[must_use]
    pub const fn new(entity_id: EntityId, card_id: CardId) -> Self {
        Self { entity_id, card_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_links_definition() {
        let card = CardInstance::new(EntityId(12), CardId::new(3));
        assert_eq!(card.entity_id, EntityId(12));
        assert_eq!(card.card_id.raw(), 3);
    }
}
