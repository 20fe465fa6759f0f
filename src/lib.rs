//! # card-battler
//!
//! Deterministic combat core for a grid-based, turn-structured card battler.
//!
//! ## Design Principles
//!
//! 1. **One pipeline**: Every point of damage, from cards, enemies, burns or
//!    traps, goes through `combat::resolve_damage` in a fixed order.
//!
//! 2. **Validate, then mutate**: Commands are checked in full before any
//!    state changes. A rejected command is a no-op.
//!
//! 3. **Terminal is immediate**: Victory and Defeat are checked after every
//!    hit. Nothing resolves once the encounter has ended.
//!
//! 4. **Seeded**: All randomness flows through one `GameRng`, so the same
//!    setup and commands replay identically.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, combatants, combat state, RNG, configuration, errors
//! - `board`: Grid, positions, adjacency tables, tile residue and traps
//! - `zones`: Deck, hand, discard and exhaust piles
//! - `cards`: Card definitions, instances, registry and the starter catalog
//! - `status`: Buff/debuff ledger
//! - `elements`: Element tags and reactions
//! - `combat`: Damage pipeline
//! - `effects`: Card effects, targeting and the effect executor
//! - `events`: Presentation notifications and sinks
//! - `rules`: Turn state machine, enemy AI and the `Encounter` session

pub mod board;
pub mod cards;
pub mod combat;
pub mod core;
pub mod effects;
pub mod elements;
pub mod events;
pub mod rules;
pub mod status;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CombatState, Combatant, CombatantSnapshot, EncounterConfig, EncounterError, EncounterSetup,
    EnemyTemplate, EntityId, GameRng, GameRngState, PlayError, PlayerTemplate, StatusSnapshot,
};

pub use crate::board::{Board, MoveError, OffsetTable, Position, Trap};

pub use crate::zones::{Pile, PileSnapshot};

pub use crate::cards::{CardDefinition, CardId, CardKind, CardRegistry};

pub use crate::status::{BuffKey, LedgerSnapshot};

pub use crate::elements::{Element, ElementSet, Reaction};

pub use crate::combat::{DamageOutcome, DamageRequest};

pub use crate::effects::{CardEffect, EffectReport, EffectResult, Target, TargetRequirement};

pub use crate::events::{CombatEvent, EventLog, EventSink, NullSink};

pub use crate::rules::{EnemyAction, Encounter, PlayOutcome, TurnPhase, TurnReport};
