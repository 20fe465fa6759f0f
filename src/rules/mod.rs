//! Encounter rules: turn structure, enemy behavior and the session facade.
//!
//! ## Key Types
//!
//! - `Encounter`: Owns a running encounter and accepts host commands
//! - `TurnPhase`: PlayerTurn, EnemyTurn, Victory or Defeat
//! - `EnemyAction`: What one enemy did with its turn

pub mod encounter;
pub mod enemy_ai;
pub mod turn;

pub use encounter::{Encounter, PlayOutcome, TurnReport};
pub use enemy_ai::{Disabled, EnemyAction};
pub use turn::TurnPhase;
