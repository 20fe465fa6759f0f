//! Combat state: everything one encounter owns.
//!
//! ## CombatState
//!
//! - Board, player, enemies (in registration order)
//! - Card instances and the player's piles
//! - Turn phase, turn number and per-turn counters
//! - Deterministic RNG
//! - Event outbox, flushed by the encounter after each command
//!
//! Subsystems receive `&mut CombatState` explicitly; there is no ambient
//! lookup of the board or turn machine.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::combatant::Combatant;
use super::config::{EncounterConfig, EncounterSetup};
use super::enemy::Enemy;
use super::entity::EntityId;
use super::error::EncounterError;
use super::player::Player;
use super::rng::GameRng;
use crate::board::{Board, MoveError, Position};
use crate::cards::{CardId, CardInstance, CardRegistry};
use crate::events::CombatEvent;
use crate::rules::TurnPhase;
use crate::zones::{Pile, PilePosition};

/// Mutable state of one encounter.
#[derive(Clone, Debug)]
pub struct CombatState {
    /// Rule tuning.
    pub config: EncounterConfig,

    /// Tile grid.
    pub board: Board,

    /// The player.
    pub player: Player,

    /// Enemies in registration order. Dead enemies stay here, marked dead,
    /// so ids remain resolvable for queries.
    enemies: Vec<Enemy>,

    /// Card instances by entity ID.
    cards: FxHashMap<EntityId, CardInstance>,

    /// Deterministic RNG.
    pub rng: GameRng,

    phase: TurnPhase,

    /// Turn number (starts at 1 on the first player turn).
    pub turn_number: u32,

    /// Cards that left hand through a discard or exhaust action this turn.
    pub cards_removed_this_turn: u32,

    next_entity_id: u32,

    outbox: Vec<CombatEvent>,
}

impl CombatState {
    /// Build the board, place every combatant and instantiate the deck.
    ///
    /// The deck is shuffled but nothing is drawn; the first player turn has
    /// not been entered yet.
    pub fn new(setup: &EncounterSetup, registry: &CardRegistry) -> Result<Self, EncounterError> {
        let config = setup.config.clone();
        let mut board = Board::new(setup.board_width, setup.board_height, config.adjacency.clone());
        let player = Player::from_template(&setup.player);
        board.place(EntityId::PLAYER, player.combatant.position)?;

        let mut state = Self {
            config,
            board,
            player,
            enemies: Vec::with_capacity(setup.enemies.len()),
            cards: FxHashMap::default(),
            rng: GameRng::new(setup.seed),
            phase: TurnPhase::PlayerTurn,
            turn_number: 0,
            cards_removed_this_turn: 0,
            next_entity_id: EntityId::FIRST_ALLOCATED,
            outbox: Vec::new(),
        };

        for template in &setup.enemies {
            let id = state.alloc_entity();
            state.board.place(id, template.position)?;
            state.enemies.push(Enemy::from_template(id, template));
        }

        for &card_id in &setup.deck {
            if !registry.contains(card_id) {
                return Err(EncounterError::UnknownDefinition(card_id));
            }
            let id = state.alloc_entity();
            state.cards.insert(id, CardInstance::new(id, card_id));
            state.player.piles.add(id, Pile::Deck, PilePosition::Top);
        }
        state.player.piles.shuffle(Pile::Deck, &mut state.rng);

        debug!(
            enemies = state.enemies.len(),
            deck = setup.deck.len(),
            seed = setup.seed,
            "combat state built"
        );
        Ok(state)
    }

    // === Entity Management ===

    /// Allocate a new entity ID.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Any combatant by id, dead or alive.
    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        if id.is_player() {
            return Some(&self.player.combatant);
        }
        self.enemy(id).map(|e| &e.combatant)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        if id.is_player() {
            return Some(&mut self.player.combatant);
        }
        self.enemy_mut(id).map(|e| &mut e.combatant)
    }

    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    /// Every enemy in registration order, including dead ones.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Living enemy ids in registration order.
    #[must_use]
    pub fn living_enemy_ids(&self) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(Enemy::id)
            .collect()
    }

    #[must_use]
    pub fn living_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    #[must_use]
    pub fn is_living_enemy(&self, id: EntityId) -> bool {
        self.enemy(id).is_some_and(Enemy::is_alive)
    }

    /// Living enemy standing on `pos`.
    #[must_use]
    pub fn enemy_at(&self, pos: Position) -> Option<EntityId> {
        self.board
            .occupant_at(pos)
            .filter(|&id| self.is_living_enemy(id))
    }

    /// Living enemies within Manhattan `radius` of `origin`, excluding
    /// whoever stands on `origin`.
    #[must_use]
    pub fn enemies_near(&self, origin: Position, radius: u32) -> Vec<EntityId> {
        self.board
            .positions_within(origin, radius)
            .into_iter()
            .filter_map(|pos| self.enemy_at(pos))
            .collect()
    }

    /// Move a combatant to `to`. Residue on the destination is picked up as
    /// element tags. A rejected move changes nothing.
    pub fn move_combatant(&mut self, id: EntityId, to: Position) -> Result<(), MoveError> {
        let from = self
            .combatant(id)
            .map(|c| c.position)
            .ok_or(MoveError::NotAtOrigin {
                entity: id,
                position: to,
            })?;
        self.board.move_entity(id, from, to)?;

        let cap = self.config.max_element_tags;
        let residue = self
            .board
            .tile_at_mut(to)
            .map(|tile| std::mem::take(&mut tile.residue))
            .unwrap_or_default();
        if let Some(c) = self.combatant_mut(id) {
            c.position = to;
            for element in residue.iter() {
                c.elements.insert(element, cap);
            }
        }
        if !residue.is_empty() {
            debug!(entity = %id, %to, "picked up residue");
        }
        self.emit_status(id);
        Ok(())
    }

    /// Take a dead enemy off the board.
    pub fn remove_enemy(&mut self, id: EntityId) {
        let Some(position) = self.enemy(id).map(|e| e.combatant.position) else {
            return;
        };
        if self.board.occupant_at(position) == Some(id) {
            self.board.vacate(position);
        }
        info!(entity = %id, %position, "enemy defeated");
        self.emit(CombatEvent::EnemyDefeated {
            entity: id,
            position,
        });
    }

    // === Phase ===

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Move to `to`. Terminal phases are final; leaving one is ignored.
    pub fn set_phase(&mut self, to: TurnPhase) {
        let from = self.phase;
        if from == to || from.is_terminal() {
            return;
        }
        self.phase = to;
        info!(?from, ?to, turn = self.turn_number, "phase changed");
        self.emit(CombatEvent::PhaseChanged { from, to });
    }

    /// Enter Defeat or Victory if the encounter just ended.
    ///
    /// Defeat is checked first: a player who dies killing the last enemy
    /// still loses. Returns the terminal phase when one is reached (or was
    /// already reached).
    pub fn check_terminal(&mut self) -> Option<TurnPhase> {
        if self.phase.is_terminal() {
            return Some(self.phase);
        }
        if !self.player.combatant.is_alive() {
            self.set_phase(TurnPhase::Defeat);
        } else if self.living_enemy_count() == 0 {
            self.set_phase(TurnPhase::Victory);
        }
        self.phase.is_terminal().then_some(self.phase)
    }

    // === Cards ===

    /// Card instance by entity ID.
    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    /// Definition id of a card instance.
    #[must_use]
    pub fn card_definition(&self, id: EntityId) -> Option<CardId> {
        self.cards.get(&id).map(|c| c.card_id)
    }

    /// Draw up to `count` cards. Returns how many reached the hand.
    pub fn draw_cards(&mut self, count: u32) -> u32 {
        let mut to_hand = 0;
        for _ in 0..count {
            match self
                .player
                .piles
                .draw(&mut self.rng, self.config.max_hand_size)
            {
                Some(crate::zones::Draw::ToHand(_)) => to_hand += 1,
                Some(crate::zones::Draw::Overflowed(card)) => {
                    debug!(%card, "hand full, drawn card discarded");
                }
                None => break,
            }
        }
        if count > 0 {
            self.emit_piles();
        }
        to_hand
    }

    /// Move a card from hand to discard, counting it as removed this turn.
    pub fn discard_from_hand(&mut self, card: EntityId) -> bool {
        self.remove_from_hand(card, Pile::Discard)
    }

    /// Move a card from hand to exhaust, counting it as removed this turn.
    pub fn exhaust_from_hand(&mut self, card: EntityId) -> bool {
        self.remove_from_hand(card, Pile::Exhaust)
    }

    fn remove_from_hand(&mut self, card: EntityId, to: Pile) -> bool {
        if self.player.piles.location(card) != Some(Pile::Hand) {
            return false;
        }
        self.player.piles.move_to(card, to, PilePosition::Top);
        self.cards_removed_this_turn += 1;
        true
    }

    /// Hand cards other than `except`, leftmost first.
    #[must_use]
    pub fn hand_except(&self, except: EntityId) -> Vec<EntityId> {
        self.player
            .piles
            .cards(Pile::Hand)
            .iter()
            .copied()
            .filter(|&c| c != except)
            .collect()
    }

    /// Remove a card from every pile for the rest of the encounter.
    pub fn destroy_card(&mut self, card: EntityId) -> bool {
        let removed = self.player.piles.remove(card).is_some();
        if removed {
            debug!(%card, "card destroyed");
            self.emit_piles();
        }
        removed
    }

    // === Events ===

    /// Queue a notification for the sink.
    pub fn emit(&mut self, event: CombatEvent) {
        self.outbox.push(event);
    }

    pub fn emit_status(&mut self, id: EntityId) {
        if let Some(status) = self.combatant(id).map(Combatant::status) {
            self.emit(CombatEvent::StatusChanged(status));
        }
    }

    pub fn emit_piles(&mut self) {
        let snapshot = self.player.piles.snapshot();
        self.emit(CombatEvent::PilesChanged(snapshot));
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.outbox)
    }
}
