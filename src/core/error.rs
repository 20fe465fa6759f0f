//! Error types for commands issued to an encounter.
//!
//! Every rejection leaves combat state untouched. Nothing here is fatal; the
//! host decides how to surface a rejected command to the player.

use crate::board::MoveError;
use crate::cards::CardId;
use crate::core::EntityId;
use crate::effects::Target;
use crate::rules::TurnPhase;

/// A card play rejected before its effect ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("encounter already ended in {0:?}")]
    EncounterOver(TurnPhase),

    #[error("cards can only be played during the player turn")]
    NotPlayerTurn,

    #[error("{0} is not in hand")]
    NotInHand(EntityId),

    #[error("{0} has no definition")]
    UnknownCard(EntityId),

    #[error("card costs {cost} energy but only {available} is available")]
    InsufficientEnergy { cost: u32, available: u32 },

    #[error("card needs a target")]
    MissingTarget,

    #[error("{0:?} is not a legal target for this card")]
    InvalidTarget(Target),

    #[error("{0:?} is out of this card's range")]
    OutOfRange(Target),

    #[error("illegal movement: {0}")]
    Movement(#[from] MoveError),
}

impl PlayError {
    /// Only the terminal guard is permanent; every other rejection can be
    /// fixed by choosing a different card or target.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, PlayError::EncounterOver(_))
    }
}

/// Encounter-level failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("encounter already ended in {0:?}")]
    EncounterOver(TurnPhase),

    #[error("turn can only be ended during the player turn")]
    NotPlayerTurn,

    #[error("deck lists {0}, which is not registered")]
    UnknownDefinition(CardId),

    #[error("cannot place combatant: {0}")]
    Placement(#[from] MoveError),
}

impl EncounterError {
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, EncounterError::NotPlayerTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn test_movement_errors_convert() {
        let err: PlayError = MoveError::OutOfBounds {
            destination: Position::new(9, 9),
        }
        .into();
        assert!(matches!(err, PlayError::Movement(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_terminal_guard_is_permanent() {
        assert!(!PlayError::EncounterOver(TurnPhase::Victory).is_recoverable());
        assert!(!EncounterError::EncounterOver(TurnPhase::Defeat).is_recoverable());
        assert!(EncounterError::NotPlayerTurn.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = PlayError::InsufficientEnergy {
            cost: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "card costs 2 energy but only 1 is available"
        );
    }
}
