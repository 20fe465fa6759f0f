//! Fields shared by every combatant.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::board::Position;
use crate::elements::ElementSet;
use crate::status::{BuffLedger, LedgerSnapshot};

/// HP, block, position, element tags and buff ledger.
///
/// HP stays within `0..=max_hp` and block never goes negative; every mutator
/// clamps.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: EntityId,
    hp: i64,
    max_hp: i64,
    block: i64,
    pub position: Position,
    pub elements: ElementSet,
    pub buffs: BuffLedger,
}

impl Combatant {
    #[must_use]
    pub fn new(id: EntityId, max_hp: i64, position: Position) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id,
            hp: max_hp,
            max_hp,
            block: 0,
            position,
            elements: ElementSet::new(),
            buffs: BuffLedger::new(),
        }
    }

    #[must_use]
    pub fn hp(&self) -> i64 {
        self.hp
    }

    #[must_use]
    pub fn max_hp(&self) -> i64 {
        self.max_hp
    }

    #[must_use]
    pub fn block(&self) -> i64 {
        self.block
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn set_hp(&mut self, hp: i64) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Reduce HP, returning the amount actually lost.
    pub fn lose_hp(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.set_hp(self.hp - amount.max(0));
        before - self.hp
    }

    /// Restore HP, returning the amount actually healed.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.set_hp(self.hp.saturating_add(amount.max(0)));
        self.hp - before
    }

    pub fn set_block(&mut self, block: i64) {
        self.block = block.max(0);
    }

    pub fn gain_block(&mut self, amount: i64) {
        self.set_block(self.block.saturating_add(amount));
    }

    /// Absorb `damage` with block. Returns `(absorbed, remaining)`.
    pub fn absorb(&mut self, damage: i64) -> (i64, i64) {
        let damage = damage.max(0);
        let absorbed = self.block.min(damage);
        self.block -= absorbed;
        (absorbed, damage - absorbed)
    }

    #[must_use]
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id,
            hp: self.hp,
            max_hp: self.max_hp,
            block: self.block,
            position: self.position,
            elements: self.elements.clone(),
            buffs: self.buffs.snapshot(),
        }
    }

    /// Element tags and ledger only.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            entity: self.id,
            elements: self.elements.clone(),
            buffs: self.buffs.snapshot(),
        }
    }
}

/// Read-only view of a combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: EntityId,
    pub hp: i64,
    pub max_hp: i64,
    pub block: i64,
    pub position: Position,
    pub elements: ElementSet,
    pub buffs: LedgerSnapshot,
}

/// Read-only view of a combatant's status display state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub entity: EntityId,
    pub elements: ElementSet,
    pub buffs: LedgerSnapshot,
}
