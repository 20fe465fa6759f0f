//! Enemy decision logic.
//!
//! One action per enemy per turn, chosen in a fixed order:
//!
//! 1. Enraging enemies at or below the berserk threshold turn berserk.
//! 2. A frozen or stunned enemy spends one counter and forfeits.
//! 3. If the player is inside the enemy's attack offsets, attack.
//! 4. Otherwise step to the adjacent free tile with the fewest steps to the
//!    player under the board's adjacency table, if that is strictly fewer
//!    than from where it stands. Ties go to the earlier offset in the table.

use tracing::{debug, info};

use crate::board::Position;
use crate::combat::{attack_damage, is_melee, resolve_damage, DamageOutcome, DamageRequest};
use crate::core::{CombatState, EntityId};

/// Why an enemy skipped its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disabled {
    Frozen,
    Stunned,
}

/// What an enemy did with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    Forfeited(Disabled),
    Attacked(DamageOutcome),
    Moved { from: Position, to: Position },
    /// No attack in range and no closer free tile.
    Waited,
}

/// Resolve one enemy's action.
pub fn take_turn(state: &mut CombatState, id: EntityId) -> EnemyAction {
    let threshold = state.config.berserk_threshold_percent;
    let bonus_percent = state.config.berserk_bonus_percent;
    let player_pos = state.player.combatant.position;

    let Some(enemy) = state.enemy_mut(id) else {
        return EnemyAction::Waited;
    };

    if enemy.enrages && !enemy.ai.berserk {
        let c = &enemy.combatant;
        if c.hp().saturating_mul(100) <= c.max_hp().saturating_mul(threshold) {
            enemy.ai.berserk = true;
            info!(enemy = %id, name = %enemy.name, "berserk");
        }
    }

    let disabled = if enemy.ai.frozen_turns > 0 {
        Some(Disabled::Frozen)
    } else if enemy.ai.stunned_turns > 0 {
        Some(Disabled::Stunned)
    } else {
        None
    };
    if let Some(reason) = disabled {
        enemy.ai.spend_disabled_turn();
        return EnemyAction::Forfeited(reason);
    }

    if enemy.in_range(player_pos) {
        let mut attack = enemy.base_attack;
        if enemy.ai.berserk {
            attack = attack.saturating_add(attack.saturating_mul(bonus_percent) / 100);
        }
        let damage = attack_damage(state, id, attack);
        let melee = is_melee(state, id, EntityId::PLAYER);
        let request = DamageRequest::new(EntityId::PLAYER, damage)
            .with_source(id)
            .with_melee(melee);
        return match resolve_damage(state, request) {
            Some(outcome) => EnemyAction::Attacked(outcome),
            None => EnemyAction::Waited,
        };
    }

    let from = enemy.combatant.position;
    match best_step(state, from, player_pos) {
        Some(to) => match state.move_combatant(id, to) {
            Ok(()) => EnemyAction::Moved { from, to },
            Err(err) => {
                debug!(enemy = %id, %err, "step rejected");
                EnemyAction::Waited
            }
        },
        None => EnemyAction::Waited,
    }
}

/// The free adjacent tile fewest steps from `goal`, if strictly fewer than
/// from `from`. Steps are counted under the board's adjacency table.
#[must_use]
pub fn best_step(state: &CombatState, from: Position, goal: Position) -> Option<Position> {
    let field = state.board.distances_to(goal);
    let current = field.get(from)?;
    state
        .board
        .adjacent_positions(from)
        .into_iter()
        .filter(|&pos| state.board.check_destination(pos).is_ok())
        .filter_map(|pos| field.get(pos).map(|steps| (pos, steps)))
        .min_by_key(|&(_, steps)| steps)
        .filter(|&(_, steps)| steps < current)
        .map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OffsetTable;
    use crate::cards::CardRegistry;
    use crate::core::{EncounterConfig, EncounterSetup, EnemyTemplate, PlayerTemplate};

    fn state(enemies: Vec<EnemyTemplate>) -> CombatState {
        let mut setup = EncounterSetup::new(6, 6, PlayerTemplate::new(30, 3, Position::new(0, 0)));
        setup.enemies = enemies;
        CombatState::new(&setup, &CardRegistry::new()).unwrap()
    }

    const FIRST: EntityId = EntityId(1);

    #[test]
    fn test_attacks_in_range() {
        let mut state = state(vec![EnemyTemplate::new("Slime", 10, 4, Position::new(1, 0))]);
        let action = take_turn(&mut state, FIRST);

        assert!(matches!(action, EnemyAction::Attacked(out) if out.hp_lost == 4));
        assert_eq!(state.player.combatant.hp(), 26);
    }

    #[test]
    fn test_ranged_attack_is_not_melee() {
        let mut state = state(vec![EnemyTemplate::new("Archer", 10, 4, Position::new(2, 0))
            .with_range(OffsetTable::cross(2))]);
        state
            .player
            .combatant
            .buffs
            .scale_ratio(crate::status::BuffKey::MeleeDamageTaken, 0.5);

        take_turn(&mut state, FIRST);
        assert_eq!(state.player.combatant.hp(), 26);
    }

    #[test]
    fn test_moves_toward_player() {
        let mut state = state(vec![EnemyTemplate::new("Slime", 10, 4, Position::new(3, 3))]);
        let action = take_turn(&mut state, FIRST);

        // (0, -1) comes first in the offset table
        assert_eq!(
            action,
            EnemyAction::Moved {
                from: Position::new(3, 3),
                to: Position::new(3, 2)
            }
        );
        assert_eq!(state.board.occupant_at(Position::new(3, 2)), Some(FIRST));
        assert_eq!(state.board.occupant_at(Position::new(3, 3)), None);
    }

    #[test]
    fn test_steps_diagonally_on_eight_neighbor_board() {
        let setup = EncounterSetup::new(6, 6, PlayerTemplate::new(30, 3, Position::new(0, 0)))
            .with_config(EncounterConfig::default().with_adjacency(OffsetTable::eight_neighbor()))
            .with_enemy(
                EnemyTemplate::new("Slime", 10, 4, Position::new(3, 3))
                    .with_range(OffsetTable::eight_neighbor()),
            );
        let mut state = CombatState::new(&setup, &CardRegistry::new()).unwrap();

        assert_eq!(
            take_turn(&mut state, FIRST),
            EnemyAction::Moved {
                from: Position::new(3, 3),
                to: Position::new(2, 2)
            }
        );
        take_turn(&mut state, FIRST);
        let action = take_turn(&mut state, FIRST);
        assert!(matches!(action, EnemyAction::Attacked(out) if out.hp_lost == 4));
    }

    #[test]
    fn test_hex_step_uses_hex_distance() {
        let setup = EncounterSetup::new(6, 6, PlayerTemplate::new(30, 3, Position::new(3, 1)))
            .with_config(EncounterConfig::default().with_adjacency(OffsetTable::hex_six()))
            .with_enemy(EnemyTemplate::new("Wall", 10, 4, Position::new(3, 2)));
        let state = CombatState::new(&setup, &CardRegistry::new()).unwrap();

        // (3, 3) is closer by Manhattan distance but still two hex steps out.
        assert_eq!(
            best_step(&state, Position::new(2, 3), Position::new(3, 1)),
            Some(Position::new(2, 2))
        );
    }

    #[test]
    fn test_blocked_enemy_waits() {
        let mut state = state(vec![
            EnemyTemplate::new("Back", 10, 4, Position::new(2, 0)),
            EnemyTemplate::new("Front", 10, 4, Position::new(1, 0))
                .with_range(OffsetTable::new([Position::new(0, 5)])),
        ]);
        // (2, 1) is free but no closer than (2, 0)
        assert_eq!(take_turn(&mut state, FIRST), EnemyAction::Waited);
    }

    #[test]
    fn test_frozen_forfeits() {
        let mut state = state(vec![EnemyTemplate::new("Slime", 10, 4, Position::new(1, 0))]);
        state.enemy_mut(FIRST).unwrap().ai.frozen_turns = 1;

        assert_eq!(take_turn(&mut state, FIRST), EnemyAction::Forfeited(Disabled::Frozen));
        assert_eq!(state.player.combatant.hp(), 30);
        assert!(matches!(take_turn(&mut state, FIRST), EnemyAction::Attacked(_)));
    }

    #[test]
    fn test_berserk_boosts_attack() {
        let mut state = state(vec![EnemyTemplate::new("Ogre", 20, 6, Position::new(1, 0)).boss()]);
        state.combatant_mut(FIRST).unwrap().set_hp(10);

        take_turn(&mut state, FIRST);

        assert!(state.enemy(FIRST).unwrap().ai.berserk);
        assert_eq!(state.player.combatant.hp(), 21);
    }
}
