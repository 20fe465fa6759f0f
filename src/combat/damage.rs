//! The damage pipeline.
//!
//! Every hit in the game, from card attacks and enemy attacks to burning
//! ticks, traps and self-inflicted costs, resolves through
//! [`resolve_damage`] in one fixed order:
//!
//! 1. Attacker-side scaling is already folded into the request amount
//!    (see [`attack_damage`]); the pipeline never recomputes it.
//! 2. Elemental reaction, if the request carries an element.
//! 3. Target ledger modifiers: next-damage-taken bonus, damage-taken ratio,
//!    then melee-damage-taken ratio for melee hits.
//! 4. Block absorption, skipped entirely for true damage.
//! 5. HP loss, clamped at 0. A guardian charge turns a lethal hit into
//!    1 HP. A dead enemy leaves the board.
//!
//! The terminal check runs before the pipeline returns, so callers only need
//! to look at `state.is_terminal()` to know whether to stop.

use tracing::debug;

use crate::core::{CombatState, EntityId};
use crate::elements::{strategy, Element, Reaction};
use crate::events::CombatEvent;
use crate::status::BuffKey;

/// One hit to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRequest {
    pub source: Option<EntityId>,
    pub target: EntityId,
    /// Nominal damage with attacker scaling already applied.
    pub amount: i64,
    pub element: Option<Element>,
    /// True damage: skip block entirely.
    pub bypass_block: bool,
    pub melee: bool,
}

impl DamageRequest {
    /// Physical, blockable, ranged, sourceless damage.
    #[must_use]
    pub const fn new(target: EntityId, amount: i64) -> Self {
        Self {
            source: None,
            target,
            amount,
            element: None,
            bypass_block: false,
            melee: false,
        }
    }

    #[must_use]
    pub const fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub const fn with_element(mut self, element: Option<Element>) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub const fn true_damage(mut self) -> Self {
        self.bypass_block = true;
        self
    }

    #[must_use]
    pub const fn with_melee(mut self, melee: bool) -> Self {
        self.melee = melee;
        self
    }
}

/// What a resolved hit did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    pub target: EntityId,
    /// Damage as requested.
    pub nominal: i64,
    /// Damage after the reaction step.
    pub after_reaction: i64,
    /// Damage after ledger modifiers, before block.
    pub modified: i64,
    /// Damage absorbed by block.
    pub absorbed: i64,
    /// HP actually lost.
    pub hp_lost: i64,
    pub reaction: Option<Reaction>,
    /// HP reached 0 and stayed there.
    pub killed: bool,
    /// A guardian charge kept the target at 1 HP.
    pub guardian_saved: bool,
}

/// Modifiers read once at pipeline start.
#[derive(Clone, Copy, Debug)]
struct TargetModifiers {
    damage_taken: f64,
    melee_damage_taken: f64,
    next_damage_taken_up: Option<i64>,
}

/// Attacker-side damage: nominal plus the next-attack bonus (consumed),
/// scaled down while weakened. Never negative.
pub fn attack_damage(state: &mut CombatState, actor: EntityId, nominal: i64) -> i64 {
    let weakened_percent = state.config.weakened_percent;
    let Some(attacker) = state.combatant_mut(actor) else {
        return nominal.max(0);
    };
    let mut damage = nominal;
    if let Some(bonus) = attacker.buffs.consume_one_shot(BuffKey::NextAttackBonus) {
        damage = damage.saturating_add(bonus);
    }
    if attacker.buffs.counter(BuffKey::Weakened) > 0 {
        damage = damage.saturating_mul(weakened_percent) / 100;
    }
    damage.max(0)
}

/// Are two combatants adjacent under the board's adjacency table?
#[must_use]
pub fn is_melee(state: &CombatState, source: EntityId, target: EntityId) -> bool {
    match (state.combatant(source), state.combatant(target)) {
        (Some(s), Some(t)) => state.board.adjacency().contains(s.position.delta_to(t.position)),
        _ => false,
    }
}

fn scale(damage: i64, ratio: f64) -> i64 {
    if ratio == 1.0 {
        return damage;
    }
    (damage as f64 * ratio).floor() as i64
}

/// Resolve one hit. Returns `None` (and changes nothing) when the target is
/// unknown or already dead.
pub fn resolve_damage(state: &mut CombatState, request: DamageRequest) -> Option<DamageOutcome> {
    let target = request.target;
    let modifiers = {
        let c = state.combatant(target).filter(|c| c.is_alive())?;
        TargetModifiers {
            damage_taken: c.buffs.ratio(BuffKey::DamageTaken),
            melee_damage_taken: c.buffs.ratio(BuffKey::MeleeDamageTaken),
            next_damage_taken_up: c.buffs.one_shot(BuffKey::NextDamageTakenUp),
        }
    };
    let nominal = request.amount.max(0);

    // Reaction
    let (after_reaction, reaction) = match request.element {
        Some(element) => {
            let out = strategy(element).calculate_damage(state, request.source, target, nominal);
            (out.damage.max(0), out.reaction)
        }
        None => (nominal, None),
    };

    // Ledger modifiers
    let mut modified = after_reaction;
    if let Some(bonus) = modifiers.next_damage_taken_up {
        modified = modified.saturating_add(bonus);
    }
    modified = scale(modified, modifiers.damage_taken);
    if request.melee {
        modified = scale(modified, modifiers.melee_damage_taken);
    }
    let modified = modified.max(0);

    let c = state.combatant_mut(target)?;
    if modifiers.next_damage_taken_up.is_some() {
        c.buffs.consume_one_shot(BuffKey::NextDamageTakenUp);
    }

    // Block
    let (absorbed, remaining) = if request.bypass_block {
        (0, modified)
    } else {
        c.absorb(modified)
    };

    // HP
    let hp_lost = c.lose_hp(remaining);
    let mut guardian_saved = false;
    let mut guardian_card = None;
    if !c.is_alive() {
        if let Some(card) = c.buffs.consume_one_shot(BuffKey::GuardianCharge) {
            c.set_hp(1);
            guardian_saved = true;
            guardian_card = u32::try_from(card).ok().map(EntityId);
        }
    }
    let killed = !c.is_alive();
    let position = c.position;

    debug!(
        %target,
        nominal,
        after_reaction,
        modified,
        absorbed,
        hp_lost,
        killed,
        guardian_saved,
        "damage resolved"
    );

    if let Some(card) = guardian_card {
        if target.is_player() {
            state.destroy_card(card);
        }
    }

    if request.source.is_some() {
        state.emit(CombatEvent::AttackSound {
            element: request.element,
        });
    }
    state.emit(CombatEvent::ImpactEffect {
        element: request.element,
        position,
    });
    state.emit_status(target);

    if killed && !target.is_player() {
        state.remove_enemy(target);
    }
    state.check_terminal();

    Some(DamageOutcome {
        target,
        nominal,
        after_reaction,
        modified,
        absorbed,
        hp_lost,
        reaction,
        killed,
        guardian_saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{OffsetTable, Position};
    use crate::cards::CardRegistry;
    use crate::core::{EncounterConfig, EncounterSetup, EnemyTemplate, PlayerTemplate};
    use crate::rules::TurnPhase;

    const ENEMY: EntityId = EntityId(1);

    fn state() -> CombatState {
        let setup = EncounterSetup::new(5, 5, PlayerTemplate::new(30, 3, Position::new(0, 0)))
            .with_enemy(EnemyTemplate::new("Dummy", 30, 3, Position::new(1, 0)))
            .with_enemy(EnemyTemplate::new("Spare", 30, 3, Position::new(4, 4)));
        CombatState::new(&setup, &CardRegistry::new()).unwrap()
    }

    #[test]
    fn test_physical_damage() {
        let mut state = state();
        let out = resolve_damage(&mut state, DamageRequest::new(ENEMY, 10)).unwrap();

        assert_eq!(out.hp_lost, 10);
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 20);
        assert_eq!(state.combatant(ENEMY).unwrap().block(), 0);
    }

    #[test]
    fn test_block_absorbs_first() {
        let mut state = state();
        state.combatant_mut(ENEMY).unwrap().gain_block(5);
        let out = resolve_damage(&mut state, DamageRequest::new(ENEMY, 10)).unwrap();

        assert_eq!(out.absorbed, 5);
        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 25);
        assert_eq!(state.combatant(ENEMY).unwrap().block(), 0);
    }

    #[test]
    fn test_true_damage_ignores_block() {
        let mut state = state();
        state.combatant_mut(ENEMY).unwrap().gain_block(50);
        resolve_damage(&mut state, DamageRequest::new(ENEMY, 7).true_damage()).unwrap();

        assert_eq!(state.combatant(ENEMY).unwrap().hp(), 23);
        assert_eq!(state.combatant(ENEMY).unwrap().block(), 50);
    }

    #[test]
    fn test_modifier_order() {
        let mut state = state();
        let buffs = &mut state.combatant_mut(ENEMY).unwrap().buffs;
        buffs.add_one_shot(BuffKey::NextDamageTakenUp, 2);
        buffs.scale_ratio(BuffKey::DamageTaken, 1.5);
        buffs.scale_ratio(BuffKey::MeleeDamageTaken, 0.5);

        let out = resolve_damage(&mut state, DamageRequest::new(ENEMY, 6).with_melee(true)).unwrap();

        // (6 + 2) * 1.5 = 12, then * 0.5 = 6
        assert_eq!(out.modified, 6);
        assert!(state
            .combatant(ENEMY)
            .unwrap()
            .buffs
            .one_shot(BuffKey::NextDamageTakenUp)
            .is_none());

        let out = resolve_damage(&mut state, DamageRequest::new(ENEMY, 6)).unwrap();
        assert_eq!(out.modified, 9);
    }

    #[test]
    fn test_reaction_runs_before_modifiers() {
        let mut state = state();
        state
            .combatant_mut(ENEMY)
            .unwrap()
            .buffs
            .add_one_shot(BuffKey::NextDamageTakenUp, 1);
        state.combatant_mut(ENEMY).unwrap().elements.insert(Element::Ice, 2);

        let out = resolve_damage(
            &mut state,
            DamageRequest::new(ENEMY, 5).with_element(Some(Element::Fire)),
        )
        .unwrap();

        assert_eq!(out.reaction, Some(Reaction::Melt));
        assert_eq!(out.after_reaction, 10);
        assert_eq!(out.modified, 11);
    }

    #[test]
    fn test_enemy_death_vacates_tile() {
        let mut state = state();
        let out = resolve_damage(&mut state, DamageRequest::new(ENEMY, 99)).unwrap();

        assert!(out.killed);
        assert_eq!(state.board.occupant_at(Position::new(1, 0)), None);
        assert_eq!(state.phase(), TurnPhase::PlayerTurn);
        assert!(resolve_damage(&mut state, DamageRequest::new(ENEMY, 1)).is_none());
    }

    #[test]
    fn test_last_enemy_death_is_victory() {
        let mut state = state();
        resolve_damage(&mut state, DamageRequest::new(ENEMY, 99));
        resolve_damage(&mut state, DamageRequest::new(EntityId(2), 99));
        assert_eq!(state.phase(), TurnPhase::Victory);
    }

    #[test]
    fn test_player_death_is_defeat() {
        let mut state = state();
        resolve_damage(&mut state, DamageRequest::new(EntityId::PLAYER, 30).true_damage());
        assert_eq!(state.phase(), TurnPhase::Defeat);
    }

    #[test]
    fn test_guardian_charge() {
        let mut state = state();
        state
            .player
            .combatant
            .buffs
            .set_one_shot(BuffKey::GuardianCharge, 77);

        let out = resolve_damage(&mut state, DamageRequest::new(EntityId::PLAYER, 100)).unwrap();

        assert!(out.guardian_saved);
        assert!(!out.killed);
        assert_eq!(state.player.combatant.hp(), 1);
        assert_eq!(state.phase(), TurnPhase::PlayerTurn);
        assert!(!state.player.combatant.buffs.contains(BuffKey::GuardianCharge));
    }

    #[test]
    fn test_attack_damage() {
        let mut state = state();
        state
            .player
            .combatant
            .buffs
            .add_one_shot(BuffKey::NextAttackBonus, 4);

        assert_eq!(attack_damage(&mut state, EntityId::PLAYER, 6), 10);
        assert_eq!(attack_damage(&mut state, EntityId::PLAYER, 6), 6);

        state.player.combatant.buffs.add_counter(BuffKey::Weakened, 1);
        assert_eq!(attack_damage(&mut state, EntityId::PLAYER, 6), 4);
        assert_eq!(attack_damage(&mut state, EntityId::PLAYER, -3), 0);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let mut state = state();
        let buffs = &mut state.player.combatant.buffs;
        buffs.add_one_shot(BuffKey::NextAttackBonus, i64::MAX);
        buffs.add_counter(BuffKey::Weakened, 1);
        let damage = attack_damage(&mut state, EntityId::PLAYER, i64::MAX);
        assert!(damage > 0);

        let cap = state.config.max_element_tags;
        let enemy = state.combatant_mut(ENEMY).unwrap();
        enemy.elements.insert(Element::Wood, cap);
        enemy.buffs.add_one_shot(BuffKey::NextDamageTakenUp, i64::MAX);

        let request = DamageRequest::new(ENEMY, damage).with_element(Some(Element::Fire));
        let outcome = resolve_damage(&mut state, request).unwrap();

        assert_eq!(outcome.reaction, Some(Reaction::Ignite));
        assert!(outcome.killed);
        assert_eq!(outcome.hp_lost, 30);
    }

    #[test]
    fn test_is_melee() {
        let state = state();
        assert!(is_melee(&state, EntityId::PLAYER, ENEMY));
        assert!(!is_melee(&state, EntityId::PLAYER, EntityId(2)));
    }

    #[test]
    fn test_melee_follows_board_adjacency() {
        let state_with = |adjacency| {
            let setup = EncounterSetup::new(5, 5, PlayerTemplate::new(30, 3, Position::new(1, 1)))
                .with_config(EncounterConfig::default().with_adjacency(adjacency))
                .with_enemy(EnemyTemplate::new("Diagonal", 30, 3, Position::new(2, 2)))
                .with_enemy(EnemyTemplate::new("Hex", 30, 3, Position::new(2, 0)));
            CombatState::new(&setup, &CardRegistry::new()).unwrap()
        };

        let square = state_with(OffsetTable::four_neighbor());
        assert!(!is_melee(&square, EntityId::PLAYER, ENEMY));
        assert!(!is_melee(&square, EntityId::PLAYER, EntityId(2)));

        let eight = state_with(OffsetTable::eight_neighbor());
        assert!(is_melee(&eight, EntityId::PLAYER, ENEMY));
        assert!(is_melee(&eight, ENEMY, EntityId::PLAYER));

        let hex = state_with(OffsetTable::hex_six());
        assert!(!is_melee(&hex, EntityId::PLAYER, ENEMY));
        assert!(is_melee(&hex, EntityId::PLAYER, EntityId(2)));
    }
}
