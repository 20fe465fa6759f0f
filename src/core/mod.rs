//! Core combat types: entities, combatants, state, RNG, configuration, errors.
//!
//! This module contains the entity model every other subsystem mutates.
//! Hosts configure encounters via `EncounterSetup` rather than modifying the
//! core.

pub mod combatant;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use combatant::{Combatant, CombatantSnapshot, StatusSnapshot};
pub use config::{EncounterConfig, EncounterSetup, EnemyTemplate, PlayerTemplate};
pub use enemy::{AiStatus, Enemy};
pub use entity::EntityId;
pub use error::{EncounterError, PlayError};
pub use player::Player;
pub use rng::{GameRng, GameRngState};
pub use state::CombatState;
