//! Encounter session: the command surface a host drives.
//!
//! An [`Encounter`] owns the combat state, the card registry and an event
//! sink. Hosts issue two commands, [`Encounter::play_card`] and
//! [`Encounter::end_player_turn`], and read everything else through
//! read-only queries. Every command validates before it mutates, so a
//! rejected command leaves the encounter exactly as it was.
//!
//! ```
//! use card_battler::board::Position;
//! use card_battler::cards::catalog::{ids, starter_registry};
//! use card_battler::core::{EncounterSetup, EnemyTemplate, PlayerTemplate};
//! use card_battler::rules::{Encounter, TurnPhase};
//!
//! let setup = EncounterSetup::new(5, 5, PlayerTemplate::new(30, 3, Position::new(0, 0)))
//!     .with_enemy(EnemyTemplate::new("Slime", 12, 3, Position::new(1, 0)))
//!     .with_deck(std::iter::repeat(ids::STRIKE).take(10));
//!
//! let mut encounter = Encounter::new(&setup, starter_registry()).unwrap();
//! assert_eq!(encounter.phase(), TurnPhase::PlayerTurn);
//! assert_eq!(encounter.hand().len(), 5);
//! ```

use tracing::{debug, info, warn};

use super::enemy_ai::EnemyAction;
use super::turn::{self, TurnPhase};
use crate::board::Board;
use crate::cards::{CardDefinition, CardRegistry};
use crate::core::{
    AiStatus, CombatState, CombatantSnapshot, EncounterError, EncounterSetup, EntityId,
    GameRngState, PlayError, StatusSnapshot,
};
use crate::effects::{execute, targeting, EffectReport, Target};
use crate::elements::ElementSet;
use crate::events::{EventSink, NullSink};
use crate::status::LedgerSnapshot;
use crate::zones::{Pile, PilePosition, PileSnapshot};

/// Result of a successful card play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    pub card: EntityId,
    pub report: EffectReport,
    /// Where the played card ended up. `None` if it left the piles entirely.
    pub destination: Option<Pile>,
    /// Phase after the play; terminal if the card ended the encounter.
    pub phase: TurnPhase,
}

/// Result of ending the player turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Every enemy action, in the order they acted.
    pub enemy_actions: Vec<(EntityId, EnemyAction)>,
    pub phase: TurnPhase,
    pub turn_number: u32,
}

/// A running encounter.
pub struct Encounter<S: EventSink = NullSink> {
    state: CombatState,
    registry: CardRegistry,
    sink: S,
}

impl Encounter<NullSink> {
    /// Start an encounter that discards notifications.
    pub fn new(setup: &EncounterSetup, registry: CardRegistry) -> Result<Self, EncounterError> {
        Self::with_sink(setup, registry, NullSink)
    }
}

impl<S: EventSink> Encounter<S> {
    /// Start an encounter, entering the first player turn.
    ///
    /// An encounter with no enemies starts in Victory.
    pub fn with_sink(
        setup: &EncounterSetup,
        registry: CardRegistry,
        sink: S,
    ) -> Result<Self, EncounterError> {
        let state = CombatState::new(setup, &registry)?;
        let mut encounter = Self {
            state,
            registry,
            sink,
        };

        info!(
            enemies = encounter.state.living_enemy_count(),
            seed = setup.seed,
            "encounter started"
        );
        if encounter.state.check_terminal().is_none() {
            turn::enter_player_turn(&mut encounter.state);
        }
        encounter.flush();
        Ok(encounter)
    }

    // === Commands ===

    /// Play `card` from hand against `target`.
    pub fn play_card(
        &mut self,
        card: EntityId,
        target: Option<Target>,
    ) -> Result<PlayOutcome, PlayError> {
        let result = self.try_play(card, target);
        match &result {
            Ok(outcome) => debug!(%card, phase = ?outcome.phase, "card played"),
            Err(err) => warn!(%card, %err, "card play rejected"),
        }
        self.flush();
        result
    }

    fn try_play(&mut self, card: EntityId, target: Option<Target>) -> Result<PlayOutcome, PlayError> {
        let phase = self.state.phase();
        if phase.is_terminal() {
            return Err(PlayError::EncounterOver(phase));
        }
        if phase != TurnPhase::PlayerTurn {
            return Err(PlayError::NotPlayerTurn);
        }
        if self.state.player.piles.location(card) != Some(Pile::Hand) {
            return Err(PlayError::NotInHand(card));
        }
        let definition = self
            .state
            .card_definition(card)
            .and_then(|id| self.registry.get(id))
            .ok_or(PlayError::UnknownCard(card))?;

        let available = self.state.player.energy();
        if definition.cost > available {
            return Err(PlayError::InsufficientEnergy {
                cost: definition.cost,
                available,
            });
        }

        targeting::validate(&self.state, definition.target_requirement(), target)?;
        if let (Some(range), Some(target)) = (&definition.range, target) {
            let origin = self.state.player.combatant.position;
            targeting::validate_range(&self.state, origin, range, definition.kind(), target)?;
        }

        // validated; nothing below can reject
        self.state.player.spend_energy(definition.cost);
        let report = execute(&mut self.state, definition, card, EntityId::PLAYER, target);

        let destination = if self.state.player.piles.location(card) == Some(Pile::Hand) {
            let pile = if definition.exhaust {
                Pile::Exhaust
            } else {
                Pile::Discard
            };
            self.state.player.piles.move_to(card, pile, PilePosition::Top);
            Some(pile)
        } else {
            self.state.player.piles.location(card)
        };

        self.state.emit_piles();
        self.state.emit_status(EntityId::PLAYER);

        Ok(PlayOutcome {
            card,
            report,
            destination,
            phase: self.state.phase(),
        })
    }

    /// End the player turn and run the enemy turn.
    ///
    /// Returns once the next player turn has begun or the encounter ended.
    pub fn end_player_turn(&mut self) -> Result<TurnReport, EncounterError> {
        let phase = self.state.phase();
        if phase.is_terminal() {
            return Err(EncounterError::EncounterOver(phase));
        }
        if phase != TurnPhase::PlayerTurn {
            return Err(EncounterError::NotPlayerTurn);
        }

        turn::end_player_turn(&mut self.state);
        let enemy_actions = turn::run_enemy_turn(&mut self.state);
        let report = TurnReport {
            enemy_actions,
            phase: self.state.phase(),
            turn_number: self.state.turn_number,
        };
        if report.phase.is_terminal() {
            info!(phase = ?report.phase, turn = report.turn_number, "encounter over");
        }
        self.flush();
        Ok(report)
    }

    fn flush(&mut self) {
        for event in self.state.take_events() {
            self.sink.notify(&event);
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.state.turn_number
    }

    /// Cards discarded or exhausted from hand by card effects this turn.
    #[must_use]
    pub fn cards_removed_this_turn(&self) -> u32 {
        self.state.cards_removed_this_turn
    }

    #[must_use]
    pub fn energy(&self) -> u32 {
        self.state.player.energy()
    }

    #[must_use]
    pub fn max_energy(&self) -> u32 {
        self.state.player.max_energy()
    }

    #[must_use]
    pub fn hp(&self, id: EntityId) -> Option<i64> {
        self.state.combatant(id).map(|c| c.hp())
    }

    #[must_use]
    pub fn block(&self, id: EntityId) -> Option<i64> {
        self.state.combatant(id).map(|c| c.block())
    }

    #[must_use]
    pub fn player(&self) -> CombatantSnapshot {
        self.state.player.combatant.snapshot()
    }

    /// Snapshots of living enemies, in registration order.
    #[must_use]
    pub fn enemies(&self) -> Vec<CombatantSnapshot> {
        self.state
            .enemies()
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.combatant.snapshot())
            .collect()
    }

    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<CombatantSnapshot> {
        self.state.combatant(id).map(|c| c.snapshot())
    }

    #[must_use]
    pub fn enemy_status(&self, id: EntityId) -> Option<AiStatus> {
        self.state.enemy(id).map(|e| e.ai)
    }

    #[must_use]
    pub fn status(&self, id: EntityId) -> Option<StatusSnapshot> {
        self.state.combatant(id).map(|c| c.status())
    }

    #[must_use]
    pub fn elements(&self, id: EntityId) -> Option<ElementSet> {
        self.state.combatant(id).map(|c| c.elements.clone())
    }

    #[must_use]
    pub fn buffs(&self, id: EntityId) -> Option<LedgerSnapshot> {
        self.state.combatant(id).map(|c| c.buffs.snapshot())
    }

    #[must_use]
    pub fn piles(&self) -> PileSnapshot {
        self.state.player.piles.snapshot()
    }

    #[must_use]
    pub fn pile(&self, pile: Pile) -> &[EntityId] {
        self.state.player.piles.cards(pile)
    }

    #[must_use]
    pub fn pile_count(&self, pile: Pile) -> usize {
        self.state.player.piles.len(pile)
    }

    #[must_use]
    pub fn hand(&self) -> &[EntityId] {
        self.pile(Pile::Hand)
    }

    /// Definition of a card instance.
    #[must_use]
    pub fn card_definition(&self, card: EntityId) -> Option<&CardDefinition> {
        self.state
            .card_definition(card)
            .and_then(|id| self.registry.get(id))
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Current RNG position. Two encounters with equal positions and equal
    /// state will draw identically from here on.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.state.rng.state()
    }

    /// Read-only view of the full combat state.
    #[must_use]
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::cards::catalog::{ids, starter_registry};
    use crate::core::{EnemyTemplate, PlayerTemplate};
    use crate::events::{CombatEvent, EventLog};

    const SLIME: EntityId = EntityId(1);

    fn setup(deck: &[crate::cards::CardId]) -> EncounterSetup {
        EncounterSetup::new(5, 5, PlayerTemplate::new(30, 3, Position::new(0, 0)))
            .with_enemy(EnemyTemplate::new("Slime", 12, 3, Position::new(1, 0)))
            .with_deck(deck.iter().copied())
    }

    fn first_in_hand(encounter: &Encounter<impl EventSink>, id: crate::cards::CardId) -> EntityId {
        *encounter
            .hand()
            .iter()
            .find(|&&c| encounter.card_definition(c).map(|d| d.id) == Some(id))
            .unwrap()
    }

    #[test]
    fn test_start_enters_first_turn() {
        let encounter = Encounter::new(&setup(&[ids::STRIKE; 8]), starter_registry()).unwrap();

        assert_eq!(encounter.turn_number(), 1);
        assert_eq!(encounter.energy(), 3);
        assert_eq!(encounter.pile_count(Pile::Hand), 5);
        assert_eq!(encounter.pile_count(Pile::Deck), 3);
    }

    #[test]
    fn test_no_enemies_is_victory() {
        let setup = EncounterSetup::new(3, 3, PlayerTemplate::new(30, 3, Position::new(0, 0)));
        let encounter = Encounter::new(&setup, starter_registry()).unwrap();
        assert_eq!(encounter.phase(), TurnPhase::Victory);
    }

    #[test]
    fn test_unknown_deck_card_rejected() {
        let setup = setup(&[crate::cards::CardId(999)]);
        let err = Encounter::new(&setup, starter_registry()).err();
        assert_eq!(err, Some(EncounterError::UnknownDefinition(crate::cards::CardId(999))));
    }

    #[test]
    fn test_play_strike() {
        let mut encounter = Encounter::new(&setup(&[ids::STRIKE; 8]), starter_registry()).unwrap();
        let card = encounter.hand()[0];

        let outcome = encounter.play_card(card, Some(SLIME.into())).unwrap();

        assert_eq!(outcome.destination, Some(Pile::Discard));
        assert_eq!(encounter.hp(SLIME), Some(6));
        assert_eq!(encounter.energy(), 2);
        assert_eq!(encounter.pile_count(Pile::Hand), 4);
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut encounter = Encounter::new(&setup(&[ids::STRIKE; 8]), starter_registry()).unwrap();
        let card = encounter.hand()[0];
        let before = encounter.piles();

        assert_eq!(encounter.play_card(card, None), Err(PlayError::MissingTarget));
        assert_eq!(
            encounter.play_card(card, Some(EntityId::PLAYER.into())),
            Err(PlayError::InvalidTarget(Target::Entity(EntityId::PLAYER)))
        );
        assert_eq!(
            encounter.play_card(EntityId(500), Some(SLIME.into())),
            Err(PlayError::NotInHand(EntityId(500)))
        );

        assert_eq!(encounter.piles(), before);
        assert_eq!(encounter.energy(), 3);
        assert_eq!(encounter.hp(SLIME), Some(12));
    }

    #[test]
    fn test_insufficient_energy() {
        let mut encounter = Encounter::new(&setup(&[ids::DEFEND; 8]), starter_registry()).unwrap();
        for _ in 0..3 {
            encounter.play_card(encounter.hand()[0], None).unwrap();
        }
        let card = encounter.hand()[0];
        assert_eq!(
            encounter.play_card(card, None),
            Err(PlayError::InsufficientEnergy {
                cost: 1,
                available: 0
            })
        );
        assert_eq!(encounter.block(EntityId::PLAYER), Some(15));
    }

    #[test]
    fn test_exhausting_card() {
        let mut encounter = Encounter::new(&setup(&[ids::FOCUS; 6]), starter_registry()).unwrap();
        let card = encounter.hand()[0];

        let outcome = encounter.play_card(card, None).unwrap();

        assert_eq!(outcome.destination, Some(Pile::Exhaust));
        assert_eq!(encounter.energy(), 4);
    }

    #[test]
    fn test_step_range_checked_before_paying() {
        let mut encounter = Encounter::new(&setup(&[ids::STEP; 6]), starter_registry()).unwrap();
        let card = encounter.hand()[0];

        let err = encounter
            .play_card(card, Some(Target::Tile(Position::new(0, 2))))
            .unwrap_err();
        assert!(matches!(err, PlayError::Movement(_)));

        encounter
            .play_card(card, Some(Target::Tile(Position::new(0, 1))))
            .unwrap();
        assert_eq!(encounter.player().position, Position::new(0, 1));
    }

    #[test]
    fn test_end_turn_after_victory_rejected() {
        let mut encounter = Encounter::new(&setup(&[ids::STRIKE; 8]), starter_registry()).unwrap();
        encounter.play_card(encounter.hand()[0], Some(SLIME.into())).unwrap();
        encounter.play_card(encounter.hand()[0], Some(SLIME.into())).unwrap();

        assert_eq!(encounter.phase(), TurnPhase::Victory);
        assert_eq!(
            encounter.end_player_turn(),
            Err(EncounterError::EncounterOver(TurnPhase::Victory))
        );
        let card = encounter.hand()[0];
        assert_eq!(
            encounter.play_card(card, Some(SLIME.into())),
            Err(PlayError::EncounterOver(TurnPhase::Victory))
        );
    }

    #[test]
    fn test_enemy_turn_round_trip() {
        let mut encounter = Encounter::new(&setup(&[ids::DEFEND; 10]), starter_registry()).unwrap();
        let card = first_in_hand(&encounter, ids::DEFEND);
        encounter.play_card(card, None).unwrap();

        let report = encounter.end_player_turn().unwrap();

        assert_eq!(report.enemy_actions.len(), 1);
        assert_eq!(report.phase, TurnPhase::PlayerTurn);
        assert_eq!(report.turn_number, 2);
        // 3 damage fully absorbed by 5 block
        assert_eq!(encounter.hp(EntityId::PLAYER), Some(30));
        assert_eq!(encounter.block(EntityId::PLAYER), Some(0));
        assert_eq!(encounter.energy(), 3);
    }

    #[test]
    fn test_events_reach_sink() {
        let mut encounter =
            Encounter::with_sink(&setup(&[ids::STRIKE; 8]), starter_registry(), EventLog::new())
                .unwrap();
        encounter.sink_mut().drain();

        encounter.play_card(encounter.hand()[0], Some(SLIME.into())).unwrap();

        let events = encounter.sink().events();
        assert!(events.iter().any(|e| matches!(e, CombatEvent::ImpactEffect { .. })));
        assert!(events.iter().any(|e| matches!(e, CombatEvent::PilesChanged(_))));
    }
}
