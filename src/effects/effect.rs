//! Card effect taxonomy.
//!
//! Every card reduces to one variant of a small closed table, grouped by kind.
//! Numeric parameters live on the variant; the element lives on the card, so
//! one effect serves every element.
//!
//! ## Attacks
//!
//! Fixed damage, conditional bonuses (own block threshold, discard this
//! turn), per-discard scaling with an explicit floor, multi-hit gated on a
//! discard succeeding, area and line attacks, and attacks with a secondary
//! consequence after damage (draw, block break, dispel).
//!
//! ## Skills
//!
//! Block, energy, HP-for-energy trades, draw/discard/exhaust, and persistent
//! ledger entries.
//!
//! ## Movement
//!
//! Reposition the actor.

use serde::{Deserialize, Serialize};

use crate::board::Trap;
use crate::cards::CardKind;

/// Attack effects. All damage values are nominal, before attacker scaling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackEffect {
    /// Hit one enemy.
    Strike { damage: i64 },

    /// `bonus` extra damage while the actor has at least `threshold` block.
    BlockScaled {
        damage: i64,
        threshold: i64,
        bonus: i64,
    },

    /// `bonus` extra damage if any card left hand via a removal action this
    /// turn.
    DiscardFueled { damage: i64, bonus: i64 },

    /// `per_card` damage for each card removed from hand this turn, never
    /// less than `min_damage`.
    PerDiscard { per_card: i64, min_damage: i64 },

    /// Discard one other card from hand; hit `hits` times if that succeeded,
    /// once otherwise.
    DiscardCombo { damage: i64, hits: u32 },

    /// Hit every enemy on the target tile and the tiles adjacent to it.
    Area { damage: i64 },

    /// Hit every enemy along a straight line of `length` tiles from the actor
    /// toward the target.
    Line { damage: i64, length: u32 },

    /// Hit, then strip up to `block_break` block from the target.
    Sunder { damage: i64, block_break: i64 },

    /// Hit, then remove every element tag from the target.
    Dispel { damage: i64 },

    /// Hit, then draw `draw` cards.
    StrikeDraw { damage: i64, draw: u32 },
}

/// Non-damage effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillEffect {
    GainBlock { amount: i64 },

    GainEnergy { amount: u32 },

    /// Lose `hp_cost` HP as true damage, then gain energy.
    BloodPact { hp_cost: i64, energy: u32 },

    Draw { count: u32 },

    /// Discard up to `discard` other cards from hand, then draw.
    DiscardDraw { discard: u32, draw: u32 },

    /// Exhaust up to `count` other cards from hand, gaining block for each.
    ExhaustForBlock { count: u32, block_per_card: i64 },

    /// Gain block and keep it through the next turn start.
    Fortify { block: i64 },

    /// Next attack card deals `bonus` extra damage.
    Empower { bonus: i64 },

    /// Scale melee damage taken until the next turn start.
    Brace { percent: i64 },

    /// Survive the next lethal hit at 1 HP. The card is destroyed when the
    /// charge fires.
    Guardian,

    /// Gain `block` at the start of the next turn.
    Entrench { block: i64 },

    /// Gain energy now; skip the next starting draw.
    Meditate { energy: u32 },

    /// Scale all damage the target enemy takes until its next turn start.
    Expose { percent: i64 },

    /// Target enemy takes `amount` extra damage from the next hit.
    Mark { amount: i64 },

    /// Target enemy deals reduced damage for `turns` turns.
    Weaken { turns: u32 },

    /// Remove own element tags and burning.
    Cleanse,

    /// Place a trap on the target tile.
    SeedTrap { trap: Trap },
}

/// Movement effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementEffect {
    /// Move to an empty tile. How far is the card's range table.
    Step,
}

/// A card's bound effect. The outer variant is the card's kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    Attack(AttackEffect),
    Skill(SkillEffect),
    Movement(MovementEffect),
}

/// What a card needs as its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRequirement {
    /// No target.
    None,
    /// A living enemy, by id or by the tile it stands on.
    Enemy,
    /// Any in-bounds tile.
    Tile,
    /// An empty in-bounds tile.
    EmptyTile,
}

impl CardEffect {
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        match self {
            CardEffect::Attack(_) => CardKind::Attack,
            CardEffect::Skill(_) => CardKind::Skill,
            CardEffect::Movement(_) => CardKind::Movement,
        }
    }

    #[must_use]
    pub const fn target_requirement(&self) -> TargetRequirement {
        match self {
            CardEffect::Attack(AttackEffect::Area { .. }) => TargetRequirement::Tile,
            CardEffect::Attack(AttackEffect::Line { .. }) => TargetRequirement::Tile,
            CardEffect::Attack(_) => TargetRequirement::Enemy,
            CardEffect::Skill(
                SkillEffect::Expose { .. } | SkillEffect::Mark { .. } | SkillEffect::Weaken { .. },
            ) => TargetRequirement::Enemy,
            CardEffect::Skill(SkillEffect::SeedTrap { .. }) => TargetRequirement::Tile,
            CardEffect::Skill(_) => TargetRequirement::None,
            CardEffect::Movement(_) => TargetRequirement::EmptyTile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        assert_eq!(
            CardEffect::Attack(AttackEffect::Strike { damage: 6 }).kind(),
            CardKind::Attack
        );
        assert_eq!(CardEffect::Skill(SkillEffect::Guardian).kind(), CardKind::Skill);
        assert_eq!(
            CardEffect::Movement(MovementEffect::Step).kind(),
            CardKind::Movement
        );
    }

    #[test]
    fn test_target_requirements() {
        let area = CardEffect::Attack(AttackEffect::Area { damage: 4 });
        let mark = CardEffect::Skill(SkillEffect::Mark { amount: 3 });
        let block = CardEffect::Skill(SkillEffect::GainBlock { amount: 5 });
        let step = CardEffect::Movement(MovementEffect::Step);

        assert_eq!(area.target_requirement(), TargetRequirement::Tile);
        assert_eq!(mark.target_requirement(), TargetRequirement::Enemy);
        assert_eq!(block.target_requirement(), TargetRequirement::None);
        assert_eq!(step.target_requirement(), TargetRequirement::EmptyTile);
    }
}
