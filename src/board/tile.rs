//! Tiles and tile-level transient effects.

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::core::EntityId;
use crate::elements::ElementSet;

/// A trap sitting on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trap {
    /// Roots grow into whoever starts their turn on the tile.
    ///
    /// Deals `damage` as true damage at the occupant's turn start and loses
    /// one charge each time it fires.
    Growth { damage: i64, charges: u32 },
}

/// Result of a trap firing on its occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapTrigger {
    pub damage: i64,
    pub exhausted: bool,
}

/// A single board cell.
///
/// The occupant is a weak reference: the tile stores the id only and never
/// owns the entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub occupant: Option<EntityId>,
    pub residue: ElementSet,
    pub trap: Option<Trap>,
}

impl Tile {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            occupant: None,
            residue: ElementSet::new(),
            trap: None,
        }
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Fire the trap, if any, consuming one charge.
    pub fn trigger_trap(&mut self) -> Option<TrapTrigger> {
        let fired = match self.trap.as_mut()? {
            Trap::Growth { damage, charges } => {
                *charges = charges.saturating_sub(1);
                TrapTrigger {
                    damage: *damage,
                    exhausted: *charges == 0,
                }
            }
        };
        if fired.exhausted {
            self.trap = None;
        }
        Some(fired)
    }
}
