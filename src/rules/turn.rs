//! Turn state machine.
//!
//! ```text
//!              end turn                 every enemy acted
//! PlayerTurn ------------> EnemyTurn ------------------------> PlayerTurn
//!     |                        |
//!     +------> Defeat <--------+    (player HP 0, checked after every hit)
//!     +------> Victory <-------+    (no living enemies, checked after every hit)
//! ```
//!
//! Victory and Defeat are terminal. Every helper here returns early once the
//! state is terminal, so a hit that ends the encounter stops all further
//! resolution.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::enemy_ai::{take_turn, EnemyAction};
use crate::combat::{resolve_damage, DamageRequest};
use crate::core::{CombatState, EntityId};
use crate::elements;
use crate::status::BuffKey;
use crate::zones::{Pile, PilePosition};

/// Encounter phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl TurnPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::Victory | TurnPhase::Defeat)
    }
}

/// Turn-start upkeep for one combatant: element hooks, ledger tick, tile
/// trap. Returns false if the encounter ended or the combatant died.
pub fn begin_turn(state: &mut CombatState, id: EntityId) -> bool {
    if state.is_terminal() || !state.combatant(id).is_some_and(|c| c.is_alive()) {
        return false;
    }

    let element_damage = elements::start_of_turn(state, id);
    if let Some(c) = state.combatant_mut(id) {
        let expired = c.buffs.tick();
        if !expired.is_empty() {
            trace!(entity = %id, ?expired, "buffs expired");
        }
    }
    if element_damage > 0 {
        resolve_damage(state, DamageRequest::new(id, element_damage).true_damage());
        if state.is_terminal() || !state.combatant(id).is_some_and(|c| c.is_alive()) {
            return false;
        }
    }

    let trap = state
        .combatant(id)
        .map(|c| c.position)
        .and_then(|pos| state.board.tile_at_mut(pos))
        .and_then(|tile| tile.trigger_trap());
    if let Some(trap) = trap {
        debug!(entity = %id, damage = trap.damage, exhausted = trap.exhausted, "trap fired");
        resolve_damage(state, DamageRequest::new(id, trap.damage).true_damage());
    }

    state.emit_status(id);
    !state.is_terminal() && state.combatant(id).is_some_and(|c| c.is_alive())
}

/// PlayerTurn entry: upkeep, block reset, deferred block, energy, draw.
pub fn enter_player_turn(state: &mut CombatState) {
    if state.is_terminal() {
        return;
    }
    state.turn_number += 1;
    state.cards_removed_this_turn = 0;
    state.set_phase(TurnPhase::PlayerTurn);

    if !begin_turn(state, EntityId::PLAYER) {
        return;
    }

    let player = &mut state.player;
    let buffs = &mut player.combatant.buffs;
    let retain_block = buffs.has_flag(BuffKey::RetainBlock);
    let draw_blocked = buffs.has_flag(BuffKey::DrawBlocked);
    let deferred_block = buffs.consume_one_shot(BuffKey::DeferredBlock);
    buffs.clear_turn_scoped();

    if !retain_block {
        player.combatant.set_block(0);
    }
    if let Some(block) = deferred_block {
        player.combatant.gain_block(block);
    }
    player.refill_energy();

    if draw_blocked {
        debug!(turn = state.turn_number, "starting draw blocked");
    } else {
        let hand_size = state.config.starting_hand_size as u32;
        state.draw_cards(hand_size);
    }
    state.emit_status(EntityId::PLAYER);
    debug!(
        turn = state.turn_number,
        energy = state.player.energy(),
        block = state.player.combatant.block(),
        hand = state.player.piles.len(Pile::Hand),
        "player turn started"
    );
}

/// Tick the counters the combatant's own action just read.
fn end_turn_upkeep(state: &mut CombatState, id: EntityId) {
    if let Some(c) = state.combatant_mut(id) {
        let expired = c.buffs.tick_after_action();
        if !expired.is_empty() {
            trace!(entity = %id, ?expired, "buffs expired");
        }
    }
    state.emit_status(id);
}

/// PlayerTurn exit: the rest of the hand goes to discard.
pub fn end_player_turn(state: &mut CombatState) {
    end_turn_upkeep(state, EntityId::PLAYER);
    let hand: Vec<EntityId> = state.player.piles.cards(Pile::Hand).to_vec();
    for card in hand {
        state.player.piles.move_to(card, Pile::Discard, PilePosition::Top);
    }
    state.emit_piles();
}

/// EnemyTurn: every living enemy acts once, in registration order, then the
/// player's turn begins. Stops the moment the encounter ends.
pub fn run_enemy_turn(state: &mut CombatState) -> Vec<(EntityId, EnemyAction)> {
    let mut actions = Vec::new();
    if state.is_terminal() {
        return actions;
    }
    state.set_phase(TurnPhase::EnemyTurn);

    for id in state.living_enemy_ids() {
        if !begin_turn(state, id) {
            if state.is_terminal() {
                return actions;
            }
            continue;
        }
        if let Some(c) = state.combatant_mut(id) {
            c.buffs.clear_turn_scoped();
        }

        let action = take_turn(state, id);
        debug!(enemy = %id, ?action, "enemy acted");
        end_turn_upkeep(state, id);
        actions.push((id, action));

        if state.check_terminal().is_some() {
            return actions;
        }
    }

    enter_player_turn(state);
    actions
}
