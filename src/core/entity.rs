//! Entity identification system.
//!
//! Every object in an encounter (the player, each enemy, each card instance)
//! has a unique `EntityId`.
//!
//! ## ID Layout
//!
//! - `0`: Reserved for the player
//! - `1..`: Enemies and card instances, allocated in creation order
//!
//! Allocation order is stable, so enemies registered first also carry the
//! lowest ids. The enemy turn relies on this for its fixed resolution order.
//!
//! ```
//! use card_battler::core::EntityId;
//!
//! assert!(EntityId::PLAYER.is_player());
//! assert!(!EntityId(7).is_player());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any encounter entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The player's id. Exactly one player exists per encounter.
    pub const PLAYER: EntityId = EntityId(0);

    /// First id handed out to non-player entities.
    pub const FIRST_ALLOCATED: u32 = 1;

    /// Check if this id refers to the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_player() {
            write!(f, "Player")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}
