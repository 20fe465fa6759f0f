//! Per-entity buff/status ledger.
//!
//! The ledger maps named modifiers to values of one of four kinds:
//!
//! - **Counter**: turns remaining; decremented once per owner turn and
//!   removed at zero. Counters that gate the owner's own action tick after
//!   that action, the rest at turn start
//! - **One-shot**: a magnitude consumed by the first qualifying action
//! - **Ratio**: multiplicative modifier, neutral `1.0`, combines by product
//! - **Flag**: persistent marker cleared at the owner's next turn start
//!
//! Backed by `im::OrdMap`, so handing out a read-only snapshot is an O(1)
//! clone and iteration order is stable.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The kind of value a key holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    Counter,
    OneShot,
    Ratio,
    Flag,
}

/// Named ledger entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuffKey {
    /// Fire damage-over-time, turns remaining.
    Burning,
    /// Outgoing attack damage is reduced while active.
    Weakened,
    /// Next attack card deals +N.
    NextAttackBonus,
    /// Next damage taken is increased by N.
    NextDamageTakenUp,
    /// Survive a lethal hit at 1 HP. Holds the raw id of the granting card.
    GuardianCharge,
    /// Block granted at the start of the owner's next turn.
    DeferredBlock,
    /// Multiplier on all damage taken.
    DamageTaken,
    /// Multiplier on melee damage taken.
    MeleeDamageTaken,
    /// Keep block through the next turn start.
    RetainBlock,
    /// Skip the starting draw of the next turn.
    DrawBlocked,
}

impl BuffKey {
    #[must_use]
    /// Counters read by the owner's own action. These tick after the
    /// action so that N turns cover N actions.
    #[must_use]
    pub const fn ticks_after_action(self) -> bool {
        matches!(self, BuffKey::Weakened)
    }

    pub const fn kind(self) -> BuffKind {
        match self {
            BuffKey::Burning | BuffKey::Weakened => BuffKind::Counter,
            BuffKey::NextAttackBonus
            | BuffKey::NextDamageTakenUp
            | BuffKey::GuardianCharge
            | BuffKey::DeferredBlock => BuffKind::OneShot,
            BuffKey::DamageTaken | BuffKey::MeleeDamageTaken => BuffKind::Ratio,
            BuffKey::RetainBlock | BuffKey::DrawBlocked => BuffKind::Flag,
        }
    }
}

/// Stored value for a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BuffValue {
    Counter(u32),
    OneShot(i64),
    Ratio(f64),
    Flag,
}

/// Read-only view of a ledger at one instant.
pub type LedgerSnapshot = OrdMap<BuffKey, BuffValue>;

/// Buff ledger owned by one combatant.
///
/// ```
/// use card_battler::status::{BuffKey, BuffLedger};
///
/// let mut ledger = BuffLedger::new();
/// ledger.add_counter(BuffKey::Burning, 2);
/// ledger.tick();
/// assert_eq!(ledger.counter(BuffKey::Burning), 1);
///
/// ledger.add_one_shot(BuffKey::NextAttackBonus, 4);
/// assert_eq!(ledger.consume_one_shot(BuffKey::NextAttackBonus), Some(4));
/// assert_eq!(ledger.consume_one_shot(BuffKey::NextAttackBonus), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffLedger {
    entries: OrdMap<BuffKey, BuffValue>,
}

impl BuffLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Counters ===

    /// Turns remaining, 0 when absent.
    #[must_use]
    pub fn counter(&self, key: BuffKey) -> u32 {
        debug_assert_eq!(key.kind(), BuffKind::Counter);
        match self.entries.get(&key) {
            Some(BuffValue::Counter(turns)) => *turns,
            _ => 0,
        }
    }

    /// Stack additional turns onto a counter.
    pub fn add_counter(&mut self, key: BuffKey, turns: u32) {
        let total = self.counter(key).saturating_add(turns);
        self.set_counter(key, total);
    }

    /// Overwrite a counter. Zero removes the entry.
    pub fn set_counter(&mut self, key: BuffKey, turns: u32) {
        debug_assert_eq!(key.kind(), BuffKind::Counter);
        if turns == 0 {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, BuffValue::Counter(turns));
        }
    }

    // === One-shots ===

    /// Pending one-shot magnitude, if set.
    #[must_use]
    pub fn one_shot(&self, key: BuffKey) -> Option<i64> {
        debug_assert_eq!(key.kind(), BuffKind::OneShot);
        match self.entries.get(&key) {
            Some(BuffValue::OneShot(amount)) => Some(*amount),
            _ => None,
        }
    }

    /// Add to a one-shot, creating it if absent.
    pub fn add_one_shot(&mut self, key: BuffKey, amount: i64) {
        let total = self.one_shot(key).unwrap_or(0).saturating_add(amount);
        self.entries.insert(key, BuffValue::OneShot(total));
    }

    /// Overwrite a one-shot.
    pub fn set_one_shot(&mut self, key: BuffKey, value: i64) {
        debug_assert_eq!(key.kind(), BuffKind::OneShot);
        self.entries.insert(key, BuffValue::OneShot(value));
    }

    /// Take the one-shot, resetting it to neutral.
    pub fn consume_one_shot(&mut self, key: BuffKey) -> Option<i64> {
        let value = self.one_shot(key)?;
        self.entries.remove(&key);
        trace!(?key, value, "one-shot consumed");
        Some(value)
    }

    // === Ratios ===

    /// Current multiplier, `1.0` when absent.
    #[must_use]
    pub fn ratio(&self, key: BuffKey) -> f64 {
        debug_assert_eq!(key.kind(), BuffKind::Ratio);
        match self.entries.get(&key) {
            Some(BuffValue::Ratio(value)) => *value,
            _ => 1.0,
        }
    }

    /// Multiply the current ratio by `factor`.
    pub fn scale_ratio(&mut self, key: BuffKey, factor: f64) {
        let value = self.ratio(key) * factor;
        self.entries.insert(key, BuffValue::Ratio(value));
    }

    // === Flags ===

    #[must_use]
    pub fn has_flag(&self, key: BuffKey) -> bool {
        debug_assert_eq!(key.kind(), BuffKind::Flag);
        matches!(self.entries.get(&key), Some(BuffValue::Flag))
    }

    pub fn set_flag(&mut self, key: BuffKey) {
        debug_assert_eq!(key.kind(), BuffKind::Flag);
        self.entries.insert(key, BuffValue::Flag);
    }

    /// Clear a flag, returning whether it was set.
    pub fn clear_flag(&mut self, key: BuffKey) -> bool {
        self.has_flag(key) && self.entries.remove(&key).is_some()
    }

    // === Turn boundaries ===

    /// Turn-start tick: decrement every counter that does not gate the
    /// owner's action. Returns the keys that expired.
    pub fn tick(&mut self) -> Vec<BuffKey> {
        self.tick_counters(|key| !key.ticks_after_action())
    }

    /// After the owner acts: decrement the counters its action read.
    pub fn tick_after_action(&mut self) -> Vec<BuffKey> {
        self.tick_counters(BuffKey::ticks_after_action)
    }

    fn tick_counters(&mut self, selected: impl Fn(BuffKey) -> bool) -> Vec<BuffKey> {
        let mut expired = Vec::new();
        let counters: Vec<(BuffKey, u32)> = self
            .entries
            .iter()
            .filter_map(|(key, value)| match value {
                BuffValue::Counter(turns) if selected(*key) => Some((*key, *turns)),
                _ => None,
            })
            .collect();

        for (key, turns) in counters {
            let remaining = turns.saturating_sub(1);
            if remaining == 0 {
                expired.push(key);
            }
            self.set_counter(key, remaining);
        }
        trace!(?expired, "ledger tick");
        expired
    }

    /// Drop every ratio and flag. Called at the owner's turn start once
    /// turn entry has read the flags it needs.
    pub fn clear_turn_scoped(&mut self) {
        let scoped: Vec<BuffKey> = self
            .entries
            .keys()
            .filter(|key| matches!(key.kind(), BuffKind::Ratio | BuffKind::Flag))
            .copied()
            .collect();
        for key in scoped {
            self.entries.remove(&key);
        }
    }

    /// Remove an entry of any kind.
    pub fn remove(&mut self, key: BuffKey) -> Option<BuffValue> {
        self.entries.remove(&key)
    }

    #[must_use]
    pub fn contains(&self, key: BuffKey) -> bool {
        self.entries.contains_key(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(1) read-only copy for presentation layers.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.entries.clone()
    }
}
