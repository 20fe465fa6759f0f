//! Notifications for presentation collaborators.
//!
//! Events are fire-and-forget: the core emits them after a state change
//! commits and never reads anything back.

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::core::{EntityId, StatusSnapshot};
use crate::elements::{Element, Reaction};
use crate::rules::TurnPhase;
use crate::zones::PileSnapshot;

/// Something a renderer, audio system or UI may want to know about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Render an impact at `position`. `element` is `None` for physical hits.
    ImpactEffect {
        element: Option<Element>,
        position: Position,
    },

    /// Play an attack sound.
    AttackSound { element: Option<Element> },

    /// A reaction resolved on `target`.
    ReactionTriggered {
        target: EntityId,
        reaction: Reaction,
        position: Position,
    },

    /// Pile contents changed; refresh deck/discard views.
    PilesChanged(PileSnapshot),

    /// Tags or ledger of an entity changed.
    StatusChanged(StatusSnapshot),

    /// An enemy was removed from play.
    EnemyDefeated { entity: EntityId, position: Position },

    /// The turn machine moved to a new phase.
    PhaseChanged { from: TurnPhase, to: TurnPhase },
}

impl CombatEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CombatEvent::ImpactEffect { .. } => "impact_effect",
            CombatEvent::AttackSound { .. } => "attack_sound",
            CombatEvent::ReactionTriggered { .. } => "reaction_triggered",
            CombatEvent::PilesChanged(_) => "piles_changed",
            CombatEvent::StatusChanged(_) => "status_changed",
            CombatEvent::EnemyDefeated { .. } => "enemy_defeated",
            CombatEvent::PhaseChanged { .. } => "phase_changed",
        }
    }
}
