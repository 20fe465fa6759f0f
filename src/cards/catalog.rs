//! Starter card catalog.
//!
//! One concrete card per taxonomy entry, plus elemental variants of the basic
//! strike. Physical single-target attacks reach the eight surrounding tiles;
//! elemental, area and line attacks reach the whole board. Hosts with their own catalogs build a `CardRegistry` directly and
//! never need this module.

use super::definition::{CardDefinition, CardId};
use super::registry::CardRegistry;
use crate::board::{OffsetTable, Trap};
use crate::effects::{AttackEffect, CardEffect, MovementEffect, SkillEffect};
use crate::elements::Element;

/// Definition ids of the starter catalog.
pub mod ids {
    use crate::cards::CardId;

    pub const STRIKE: CardId = CardId::new(1);
    pub const DEFEND: CardId = CardId::new(2);
    pub const STEP: CardId = CardId::new(3);
    pub const SHIELD_BASH: CardId = CardId::new(4);
    pub const RECKLESS_SWING: CardId = CardId::new(5);
    pub const SCRAP_BARRAGE: CardId = CardId::new(6);
    pub const FLURRY: CardId = CardId::new(7);
    pub const QUAKE: CardId = CardId::new(8);
    pub const LANCE: CardId = CardId::new(9);
    pub const SUNDER: CardId = CardId::new(10);
    pub const PURGE: CardId = CardId::new(11);
    pub const QUICK_SLASH: CardId = CardId::new(12);
    pub const FIRE_STRIKE: CardId = CardId::new(13);
    pub const WATER_STRIKE: CardId = CardId::new(14);
    pub const ICE_STRIKE: CardId = CardId::new(15);
    pub const THUNDER_STRIKE: CardId = CardId::new(16);
    pub const WOOD_STRIKE: CardId = CardId::new(17);
    pub const FOCUS: CardId = CardId::new(18);
    pub const BLOOD_PACT: CardId = CardId::new(19);
    pub const STUDY: CardId = CardId::new(20);
    pub const SIFT: CardId = CardId::new(21);
    pub const BURN_NOTES: CardId = CardId::new(22);
    pub const FORTIFY: CardId = CardId::new(23);
    pub const WAR_CRY: CardId = CardId::new(24);
    pub const BRACE: CardId = CardId::new(25);
    pub const GUARDIAN_ANGEL: CardId = CardId::new(26);
    pub const ENTRENCH: CardId = CardId::new(27);
    pub const MEDITATE: CardId = CardId::new(28);
    pub const EXPOSE: CardId = CardId::new(29);
    pub const MARK: CardId = CardId::new(30);
    pub const ENFEEBLE: CardId = CardId::new(31);
    pub const CLEANSE: CardId = CardId::new(32);
    pub const BRAMBLE_SEED: CardId = CardId::new(33);
    pub const DASH: CardId = CardId::new(34);
}

fn attack(id: CardId, name: &str, cost: u32, effect: AttackEffect) -> CardDefinition {
    CardDefinition::new(id, name, cost, CardEffect::Attack(effect))
}

fn melee(id: CardId, name: &str, cost: u32, effect: AttackEffect) -> CardDefinition {
    attack(id, name, cost, effect).with_range(OffsetTable::eight_neighbor())
}

fn skill(id: CardId, name: &str, cost: u32, effect: SkillEffect) -> CardDefinition {
    CardDefinition::new(id, name, cost, CardEffect::Skill(effect))
}

fn movement(id: CardId, name: &str, cost: u32, effect: MovementEffect) -> CardDefinition {
    CardDefinition::new(id, name, cost, CardEffect::Movement(effect))
}

/// Every starter card definition.
#[must_use]
pub fn starter_cards() -> Vec<CardDefinition> {
    use ids::*;

    let strike = |id, name, element| {
        attack(id, name, 1, AttackEffect::Strike { damage: 6 }).with_element(element)
    };

    vec![
        melee(STRIKE, "Strike", 1, AttackEffect::Strike { damage: 6 }),
        skill(DEFEND, "Defend", 1, SkillEffect::GainBlock { amount: 5 }),
        movement(STEP, "Step", 0, MovementEffect::Step).with_range(OffsetTable::diamond(1)),
        melee(
            SHIELD_BASH,
            "Shield Bash",
            1,
            AttackEffect::BlockScaled {
                damage: 5,
                threshold: 10,
                bonus: 5,
            },
        ),
        melee(
            RECKLESS_SWING,
            "Reckless Swing",
            1,
            AttackEffect::DiscardFueled { damage: 6, bonus: 4 },
        ),
        attack(
            SCRAP_BARRAGE,
            "Scrap Barrage",
            1,
            AttackEffect::PerDiscard {
                per_card: 3,
                min_damage: 2,
            },
        ),
        melee(FLURRY, "Flurry", 1, AttackEffect::DiscardCombo { damage: 3, hits: 3 }),
        attack(QUAKE, "Quake", 2, AttackEffect::Area { damage: 5 }),
        attack(LANCE, "Lance", 1, AttackEffect::Line { damage: 5, length: 3 }),
        melee(
            SUNDER,
            "Sunder",
            2,
            AttackEffect::Sunder {
                damage: 6,
                block_break: 8,
            },
        ),
        attack(PURGE, "Purge", 1, AttackEffect::Dispel { damage: 4 }),
        melee(QUICK_SLASH, "Quick Slash", 1, AttackEffect::StrikeDraw { damage: 4, draw: 1 }),
        strike(FIRE_STRIKE, "Fire Strike", Element::Fire),
        strike(WATER_STRIKE, "Water Strike", Element::Water),
        strike(ICE_STRIKE, "Ice Strike", Element::Ice),
        strike(THUNDER_STRIKE, "Thunder Strike", Element::Thunder),
        strike(WOOD_STRIKE, "Wood Strike", Element::Wood),
        skill(FOCUS, "Focus", 0, SkillEffect::GainEnergy { amount: 1 }).exhausting(),
        skill(
            BLOOD_PACT,
            "Blood Pact",
            0,
            SkillEffect::BloodPact {
                hp_cost: 3,
                energy: 2,
            },
        ),
        skill(STUDY, "Study", 1, SkillEffect::Draw { count: 2 }),
        skill(SIFT, "Sift", 0, SkillEffect::DiscardDraw { discard: 1, draw: 2 }),
        skill(
            BURN_NOTES,
            "Burn Notes",
            1,
            SkillEffect::ExhaustForBlock {
                count: 2,
                block_per_card: 4,
            },
        )
        .exhausting(),
        skill(FORTIFY, "Fortify", 2, SkillEffect::Fortify { block: 8 }),
        skill(WAR_CRY, "War Cry", 1, SkillEffect::Empower { bonus: 4 }),
        skill(BRACE, "Brace", 1, SkillEffect::Brace { percent: 50 }),
        skill(GUARDIAN_ANGEL, "Guardian Angel", 2, SkillEffect::Guardian),
        skill(ENTRENCH, "Entrench", 1, SkillEffect::Entrench { block: 10 }),
        skill(MEDITATE, "Meditate", 0, SkillEffect::Meditate { energy: 2 }),
        skill(EXPOSE, "Expose", 1, SkillEffect::Expose { percent: 150 }),
        skill(MARK, "Mark", 0, SkillEffect::Mark { amount: 4 }),
        skill(ENFEEBLE, "Enfeeble", 1, SkillEffect::Weaken { turns: 2 }),
        skill(CLEANSE, "Cleanse", 1, SkillEffect::Cleanse),
        skill(
            BRAMBLE_SEED,
            "Bramble Seed",
            1,
            SkillEffect::SeedTrap {
                trap: Trap::Growth {
                    damage: 3,
                    charges: 2,
                },
            },
        )
        .with_element(Element::Wood),
        movement(DASH, "Dash", 1, MovementEffect::Step).with_range(OffsetTable::diamond(3)),
    ]
}

/// Registry holding every starter card.
#[must_use]
pub fn starter_registry() -> CardRegistry {
    starter_cards().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    #[test]
    fn test_ids_unique() {
        let cards = starter_cards();
        let registry = starter_registry();
        assert_eq!(registry.len(), cards.len());
    }

    #[test]
    fn test_every_kind_present() {
        let registry = starter_registry();
        for kind in [CardKind::Attack, CardKind::Skill, CardKind::Movement] {
            assert!(registry.find_by_kind(kind).count() > 0, "{kind:?}");
        }
    }

    #[test]
    fn test_movement_cards_have_range() {
        let registry = starter_registry();
        for card in registry.find_by_kind(CardKind::Movement) {
            assert!(card.range.is_some(), "{}", card.name);
        }
    }

    #[test]
    fn test_elemental_strikes() {
        let registry = starter_registry();
        for element in Element::ALL {
            assert!(
                registry
                    .iter()
                    .any(|c| c.element == Some(element)
                        && matches!(c.effect, CardEffect::Attack(AttackEffect::Strike { .. }))),
                "{element}"
            );
        }
    }
}
