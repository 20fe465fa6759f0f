//! Card effect executor.
//!
//! [`execute`] applies one card's bound effect exactly once. Cost and target
//! legality are the caller's concern; the executor assumes they hold, and
//! still degrades to [`EffectResult::NoEffect`] rather than panicking when a
//! target has gone missing.
//!
//! ## Capability Surface
//!
//! - Attack: compute damage through the actor's scaling, drive the damage
//!   pipeline on one or more targets, then apply any secondary consequence
//! - Skill: block, energy, draw/discard/exhaust, ledger entries, self-damage
//! - Movement: reposition the actor
//!
//! Resolution stops the moment the encounter reaches a terminal phase.

use tracing::debug;

use super::effect::{AttackEffect, CardEffect, MovementEffect, SkillEffect};
use super::targeting::{area_targets, enemy_target, line_targets, Target};
use crate::board::MoveError;
use crate::cards::CardDefinition;
use crate::combat::{attack_damage, is_melee, resolve_damage, DamageOutcome, DamageRequest};
use crate::core::{CombatState, EntityId};
use crate::elements::Element;
use crate::status::BuffKey;

/// How a card's effect went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectResult {
    Applied,
    /// Target absent or invalid; nothing changed.
    NoEffect,
    /// The board rejected a move; nothing changed.
    Rejected(MoveError),
}

/// Everything one card play did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectReport {
    pub result: EffectResult,
    /// Every hit resolved, in order.
    pub hits: Vec<DamageOutcome>,
    /// Cards that reached the hand.
    pub drawn: u32,
    /// Cards that left hand through a discard or exhaust action.
    pub removed: u32,
}

impl EffectReport {
    fn new() -> Self {
        Self {
            result: EffectResult::Applied,
            hits: Vec::new(),
            drawn: 0,
            removed: 0,
        }
    }

    fn no_effect() -> Self {
        Self {
            result: EffectResult::NoEffect,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn applied(&self) -> bool {
        self.result == EffectResult::Applied
    }

    /// Total HP lost across all hits.
    #[must_use]
    pub fn hp_lost(&self) -> i64 {
        self.hits.iter().map(|h| h.hp_lost).sum()
    }
}

/// Apply `card`'s effect for `actor`. `instance` is the played copy; it is
/// excluded from the card's own discard and exhaust choices.
pub fn execute(
    state: &mut CombatState,
    card: &CardDefinition,
    instance: EntityId,
    actor: EntityId,
    target: Option<Target>,
) -> EffectReport {
    let report = match &card.effect {
        CardEffect::Attack(effect) => attack(state, effect, card.element, instance, actor, target),
        CardEffect::Skill(effect) => skill(state, effect, card.element, instance, actor, target),
        CardEffect::Movement(effect) => movement(state, effect, actor, target),
    };
    debug!(
        card = %card.name,
        %actor,
        result = ?report.result,
        hits = report.hits.len(),
        "card executed"
    );
    report
}

/// One pipeline hit. Returns false once resolution must stop.
fn hit(
    state: &mut CombatState,
    report: &mut EffectReport,
    actor: EntityId,
    target: EntityId,
    damage: i64,
    element: Option<Element>,
) -> bool {
    let melee = is_melee(state, actor, target);
    let request = DamageRequest::new(target, damage)
        .with_source(actor)
        .with_element(element)
        .with_melee(melee);
    match resolve_damage(state, request) {
        Some(outcome) => {
            report.hits.push(outcome);
            !state.is_terminal()
        }
        None => false,
    }
}

fn target_alive(state: &CombatState, target: EntityId) -> bool {
    state.combatant(target).is_some_and(|c| c.is_alive())
}

fn attack(
    state: &mut CombatState,
    effect: &AttackEffect,
    element: Option<Element>,
    instance: EntityId,
    actor: EntityId,
    target: Option<Target>,
) -> EffectReport {
    let mut report = EffectReport::new();

    match *effect {
        AttackEffect::Area { damage } => {
            let Some(center) = target.and_then(|t| t.position(state)) else {
                return EffectReport::no_effect();
            };
            let targets = area_targets(state, center);
            if targets.is_empty() {
                return EffectReport::no_effect();
            }
            let damage = attack_damage(state, actor, damage);
            for t in targets {
                if !hit(state, &mut report, actor, t, damage, element) && state.is_terminal() {
                    break;
                }
            }
            return report;
        }
        AttackEffect::Line { damage, length } => {
            let origin = state.combatant(actor).map(|c| c.position);
            let toward = target.and_then(|t| t.position(state));
            let targets = match (origin, toward) {
                (Some(origin), Some(toward)) => line_targets(state, origin, toward, length),
                _ => Vec::new(),
            };
            if targets.is_empty() {
                return EffectReport::no_effect();
            }
            let damage = attack_damage(state, actor, damage);
            for t in targets {
                if !hit(state, &mut report, actor, t, damage, element) && state.is_terminal() {
                    break;
                }
            }
            return report;
        }
        _ => {}
    }

    let Some(t) = enemy_target(state, target) else {
        return EffectReport::no_effect();
    };

    match *effect {
        AttackEffect::Strike { damage } => {
            let damage = attack_damage(state, actor, damage);
            hit(state, &mut report, actor, t, damage, element);
        }
        AttackEffect::BlockScaled {
            damage,
            threshold,
            bonus,
        } => {
            let block = state.combatant(actor).map_or(0, |c| c.block());
            let nominal = if block >= threshold { damage + bonus } else { damage };
            let damage = attack_damage(state, actor, nominal);
            hit(state, &mut report, actor, t, damage, element);
        }
        AttackEffect::DiscardFueled { damage, bonus } => {
            let nominal = if state.cards_removed_this_turn > 0 {
                damage + bonus
            } else {
                damage
            };
            let damage = attack_damage(state, actor, nominal);
            hit(state, &mut report, actor, t, damage, element);
        }
        AttackEffect::PerDiscard {
            per_card,
            min_damage,
        } => {
            let nominal = per_card.saturating_mul(i64::from(state.cards_removed_this_turn));
            let damage = attack_damage(state, actor, nominal).max(min_damage);
            hit(state, &mut report, actor, t, damage, element);
        }
        AttackEffect::DiscardCombo { damage, hits } => {
            let discarded = state
                .hand_except(instance)
                .first()
                .is_some_and(|&card| state.discard_from_hand(card));
            if discarded {
                report.removed += 1;
                state.emit_piles();
            }
            let count = if discarded { hits.max(1) } else { 1 };
            let damage = attack_damage(state, actor, damage);
            for _ in 0..count {
                if !hit(state, &mut report, actor, t, damage, element) {
                    break;
                }
            }
        }
        AttackEffect::Sunder {
            damage,
            block_break,
        } => {
            let damage = attack_damage(state, actor, damage);
            if hit(state, &mut report, actor, t, damage, element) && target_alive(state, t) {
                if let Some(c) = state.combatant_mut(t) {
                    let block = c.block();
                    c.set_block(block - block_break.max(0));
                }
                state.emit_status(t);
            }
        }
        AttackEffect::Dispel { damage } => {
            let damage = attack_damage(state, actor, damage);
            if hit(state, &mut report, actor, t, damage, element) && target_alive(state, t) {
                if let Some(c) = state.combatant_mut(t) {
                    c.elements.clear();
                    c.buffs.remove(BuffKey::Burning);
                }
                state.emit_status(t);
            }
        }
        AttackEffect::StrikeDraw { damage, draw } => {
            let damage = attack_damage(state, actor, damage);
            if hit(state, &mut report, actor, t, damage, element) {
                report.drawn += state.draw_cards(draw);
            }
        }
        AttackEffect::Area { .. } | AttackEffect::Line { .. } => {}
    }
    report
}

fn skill(
    state: &mut CombatState,
    effect: &SkillEffect,
    element: Option<Element>,
    instance: EntityId,
    actor: EntityId,
    target: Option<Target>,
) -> EffectReport {
    let mut report = EffectReport::new();

    match effect {
        SkillEffect::GainBlock { amount } => {
            if let Some(c) = state.combatant_mut(actor) {
                c.gain_block(*amount);
            }
        }
        SkillEffect::GainEnergy { amount } => {
            if actor.is_player() {
                state.player.gain_energy(*amount);
            }
        }
        SkillEffect::BloodPact { hp_cost, energy } => {
            let request = DamageRequest::new(actor, *hp_cost).true_damage();
            if let Some(outcome) = resolve_damage(state, request) {
                report.hits.push(outcome);
            }
            if state.is_terminal() {
                return report;
            }
            if actor.is_player() {
                state.player.gain_energy(*energy);
            }
        }
        SkillEffect::Draw { count } => {
            report.drawn += state.draw_cards(*count);
        }
        SkillEffect::DiscardDraw { discard, draw } => {
            for card in state.hand_except(instance).into_iter().take(*discard as usize) {
                if state.discard_from_hand(card) {
                    report.removed += 1;
                }
            }
            state.emit_piles();
            report.drawn += state.draw_cards(*draw);
        }
        SkillEffect::ExhaustForBlock {
            count,
            block_per_card,
        } => {
            let mut exhausted = 0;
            for card in state.hand_except(instance).into_iter().take(*count as usize) {
                if state.exhaust_from_hand(card) {
                    exhausted += 1;
                }
            }
            report.removed += exhausted;
            state.emit_piles();
            if let Some(c) = state.combatant_mut(actor) {
                c.gain_block(block_per_card.saturating_mul(i64::from(exhausted)));
            }
        }
        SkillEffect::Fortify { block } => {
            if let Some(c) = state.combatant_mut(actor) {
                c.gain_block(*block);
                c.buffs.set_flag(BuffKey::RetainBlock);
            }
        }
        SkillEffect::Empower { bonus } => {
            if let Some(c) = state.combatant_mut(actor) {
                c.buffs.add_one_shot(BuffKey::NextAttackBonus, *bonus);
            }
        }
        SkillEffect::Brace { percent } => {
            if let Some(c) = state.combatant_mut(actor) {
                c.buffs
                    .scale_ratio(BuffKey::MeleeDamageTaken, *percent as f64 / 100.0);
            }
        }
        SkillEffect::Guardian => {
            if let Some(c) = state.combatant_mut(actor) {
                c.buffs
                    .set_one_shot(BuffKey::GuardianCharge, i64::from(instance.raw()));
            }
        }
        SkillEffect::Entrench { block } => {
            if let Some(c) = state.combatant_mut(actor) {
                c.buffs.add_one_shot(BuffKey::DeferredBlock, *block);
            }
        }
        SkillEffect::Meditate { energy } => {
            if actor.is_player() {
                state.player.gain_energy(*energy);
            }
            if let Some(c) = state.combatant_mut(actor) {
                c.buffs.set_flag(BuffKey::DrawBlocked);
            }
        }
        SkillEffect::Expose { percent } => {
            let Some(t) = enemy_target(state, target) else {
                return EffectReport::no_effect();
            };
            if let Some(c) = state.combatant_mut(t) {
                c.buffs
                    .scale_ratio(BuffKey::DamageTaken, *percent as f64 / 100.0);
            }
            state.emit_status(t);
        }
        SkillEffect::Mark { amount } => {
            let Some(t) = enemy_target(state, target) else {
                return EffectReport::no_effect();
            };
            if let Some(c) = state.combatant_mut(t) {
                c.buffs.add_one_shot(BuffKey::NextDamageTakenUp, *amount);
            }
            state.emit_status(t);
        }
        SkillEffect::Weaken { turns } => {
            let Some(t) = enemy_target(state, target) else {
                return EffectReport::no_effect();
            };
            if let Some(c) = state.combatant_mut(t) {
                c.buffs.add_counter(BuffKey::Weakened, *turns);
            }
            state.emit_status(t);
        }
        SkillEffect::Cleanse => {
            if let Some(c) = state.combatant_mut(actor) {
                c.elements.clear();
                c.buffs.remove(BuffKey::Burning);
                c.buffs.remove(BuffKey::Weakened);
            }
        }
        SkillEffect::SeedTrap { trap } => {
            let Some(pos) = target.and_then(|t| t.position(state)) else {
                return EffectReport::no_effect();
            };
            if !state.board.set_trap(pos, trap.clone()) {
                return EffectReport::no_effect();
            }
            if let Some(element) = element {
                let cap = state.config.max_element_tags;
                state.board.add_residue(pos, element, cap);
            }
            debug!(%pos, ?trap, "trap set");
        }
    }

    state.emit_status(actor);
    report
}

fn movement(
    state: &mut CombatState,
    effect: &MovementEffect,
    actor: EntityId,
    target: Option<Target>,
) -> EffectReport {
    let Some(Target::Tile(to)) = target else {
        return EffectReport::no_effect();
    };
    match effect {
        MovementEffect::Step => match state.move_combatant(actor, to) {
            Ok(()) => EffectReport::new(),
            Err(err) => EffectReport {
                result: EffectResult::Rejected(err),
                ..EffectReport::new()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::cards::catalog::{ids, starter_registry};
    use crate::cards::{CardId, CardRegistry};
    use crate::core::{EncounterSetup, EnemyTemplate, PlayerTemplate};
    use crate::zones::Pile;

    const ENEMY: EntityId = EntityId(1);

    fn setup() -> (CombatState, CardRegistry) {
        let registry = starter_registry();
        let setup = EncounterSetup::new(6, 6, PlayerTemplate::new(30, 3, Position::new(0, 0)))
            .with_enemy(EnemyTemplate::new("Dummy", 40, 3, Position::new(1, 0)))
            .with_enemy(EnemyTemplate::new("Other", 40, 3, Position::new(4, 0)))
            .with_deck(std::iter::repeat(ids::STRIKE).take(8));
        let mut state = CombatState::new(&setup, &registry).unwrap();
        state.draw_cards(5);
        (state, registry)
    }

    fn play(state: &mut CombatState, registry: &CardRegistry, id: CardId, target: Option<Target>) -> EffectReport {
        let card = registry.get(id).unwrap();
        execute(state, card, EntityId(999), EntityId::PLAYER, target)
    }

    #[test]
    fn test_strike() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::STRIKE, Some(ENEMY.into()));

        assert!(report.applied());
        assert_eq!(report.hp_lost(), 6);
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 34);
    }

    #[test]
    fn test_missing_target_is_no_effect() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::STRIKE, None);
        assert_eq!(report.result, EffectResult::NoEffect);

        let report = play(&mut state, &registry, ids::STRIKE, Some(Target::Tile(Position::new(3, 3))));
        assert_eq!(report.result, EffectResult::NoEffect);
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 40);
    }

    #[test]
    fn test_block_scaled() {
        let (mut state, registry) = setup();
        play(&mut state, &registry, ids::SHIELD_BASH, Some(ENEMY.into()));
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 35);

        state.player.combatant.gain_block(10);
        play(&mut state, &registry, ids::SHIELD_BASH, Some(ENEMY.into()));
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 25);
    }

    #[test]
    fn test_per_discard_floor() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::SCRAP_BARRAGE, Some(ENEMY.into()));
        assert_eq!(report.hp_lost(), 2);

        state.cards_removed_this_turn = 3;
        let report = play(&mut state, &registry, ids::SCRAP_BARRAGE, Some(ENEMY.into()));
        assert_eq!(report.hp_lost(), 9);
    }

    #[test]
    fn test_discard_combo_gated() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::FLURRY, Some(ENEMY.into()));

        assert_eq!(report.hits.len(), 3);
        assert_eq!(report.removed, 1);
        assert_eq!(state.cards_removed_this_turn, 1);
        assert_eq!(state.player.piles.len(Pile::Hand), 4);

        let hand: Vec<EntityId> = state.player.piles.cards(Pile::Hand).to_vec();
        for card in hand {
            state.discard_from_hand(card);
        }
        let report = play(&mut state, &registry, ids::FLURRY, Some(ENEMY.into()));
        assert_eq!(report.hits.len(), 1);
    }

    #[test]
    fn test_line_hits_in_order() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::LANCE, Some(Target::Tile(Position::new(1, 0))));

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].target, ENEMY);

        state.move_combatant(EntityId(2), Position::new(2, 0)).unwrap();
        let report = play(&mut state, &registry, ids::LANCE, Some(Target::Tile(Position::new(3, 0))));
        assert_eq!(report.hits.len(), 2);
    }

    #[test]
    fn test_sunder_and_dispel() {
        let (mut state, registry) = setup();
        state.combatant_mut(ENEMY).unwrap().gain_block(20);
        play(&mut state, &registry, ids::SUNDER, Some(ENEMY.into()));
        assert_eq!(state.combatant(ENEMY).unwrap().block(), 6);

        play(&mut state, &registry, ids::FIRE_STRIKE, Some(ENEMY.into()));
        play(&mut state, &registry, ids::PURGE, Some(ENEMY.into()));
        let c = state.combatant(ENEMY).unwrap();
        assert!(c.elements.is_empty());
        assert_eq!(c.buffs.counter(BuffKey::Burning), 0);
    }

    #[test]
    fn test_blood_pact_is_true_damage() {
        let (mut state, registry) = setup();
        state.player.combatant.gain_block(10);
        play(&mut state, &registry, ids::BLOOD_PACT, None);

        assert_eq!(state.player.combatant.hp(), 27);
        assert_eq!(state.player.combatant.block(), 10);
        assert_eq!(state.player.energy(), 2);
    }

    #[test]
    fn test_blood_pact_can_kill() {
        let (mut state, registry) = setup();
        state.player.combatant.set_hp(3);
        play(&mut state, &registry, ids::BLOOD_PACT, None);

        assert!(state.is_terminal());
        assert_eq!(state.player.energy(), 0);
    }

    #[test]
    fn test_empower_consumed_by_next_attack() {
        let (mut state, registry) = setup();
        play(&mut state, &registry, ids::WAR_CRY, None);
        play(&mut state, &registry, ids::STRIKE, Some(ENEMY.into()));
        play(&mut state, &registry, ids::STRIKE, Some(ENEMY.into()));

        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 40 - 10 - 6);
    }

    #[test]
    fn test_exhaust_for_block() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::BURN_NOTES, None);

        assert_eq!(report.removed, 2);
        assert_eq!(state.player.piles.len(Pile::Exhaust), 2);
        assert_eq!(state.player.combatant.block(), 8);
    }

    #[test]
    fn test_step() {
        let (mut state, registry) = setup();
        let report = play(&mut state, &registry, ids::STEP, Some(Target::Tile(Position::new(0, 1))));
        assert!(report.applied());
        assert_eq!(state.player.combatant.position, Position::new(0, 1));

        let report = play(&mut state, &registry, ids::STEP, Some(Target::Tile(Position::new(-1, 1))));
        assert!(matches!(report.result, EffectResult::Rejected(MoveError::OutOfBounds { .. })));
        assert_eq!(state.player.combatant.position, Position::new(0, 1));
    }

    #[test]
    fn test_seed_trap_leaves_residue() {
        let (mut state, registry) = setup();
        play(&mut state, &registry, ids::BRAMBLE_SEED, Some(Target::Tile(Position::new(4, 0))));

        let tile = state.board.tile_at(Position::new(4, 0)).unwrap();
        assert!(tile.trap.is_some());
        assert!(tile.residue.contains(Element::Wood));
    }
}
