//! Targets and target selection.
//!
//! A card target is either an entity or a tile. Selection helpers turn a
//! target into the set of enemies an effect actually hits; they read state
//! and never mutate it.

use serde::{Deserialize, Serialize};

use super::effect::TargetRequirement;
use crate::board::{MoveError, OffsetTable, Position};
use crate::cards::CardKind;
use crate::core::{CombatState, EntityId, PlayError};

/// What a card is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Entity(EntityId),
    Tile(Position),
}

impl Target {
    /// Where the target is. `None` for unknown entities.
    #[must_use]
    pub fn position(self, state: &CombatState) -> Option<Position> {
        match self {
            Target::Entity(id) => state.combatant(id).map(|c| c.position),
            Target::Tile(pos) => Some(pos),
        }
    }
}

impl From<EntityId> for Target {
    fn from(id: EntityId) -> Self {
        Target::Entity(id)
    }
}

impl From<Position> for Target {
    fn from(pos: Position) -> Self {
        Target::Tile(pos)
    }
}

/// Resolve a target to a living enemy, either directly or through the tile
/// it stands on.
#[must_use]
pub fn enemy_target(state: &CombatState, target: Option<Target>) -> Option<EntityId> {
    match target? {
        Target::Entity(id) => state.is_living_enemy(id).then_some(id),
        Target::Tile(pos) => state.enemy_at(pos),
    }
}

/// Living enemies on `center` and the tiles adjacent to it, center first.
#[must_use]
pub fn area_targets(state: &CombatState, center: Position) -> Vec<EntityId> {
    std::iter::once(center)
        .chain(state.board.adjacent_positions(center))
        .filter_map(|pos| state.enemy_at(pos))
        .collect()
}

/// Living enemies along a straight line of `length` tiles from `origin`
/// toward `toward`, nearest first. Empty when the two are not aligned on a
/// row or column.
#[must_use]
pub fn line_targets(state: &CombatState, origin: Position, toward: Position, length: u32) -> Vec<EntityId> {
    let delta = origin.delta_to(toward);
    if (delta.x != 0 && delta.y != 0) || delta == Position::default() {
        return Vec::new();
    }
    let step = origin.direction_to(toward);
    let mut pos = origin;
    let mut hit = Vec::new();
    for _ in 0..length {
        pos = pos.offset(step);
        if !state.board.in_bounds(pos) {
            break;
        }
        if let Some(id) = state.enemy_at(pos) {
            hit.push(id);
        }
    }
    hit
}

/// Check that `target` satisfies a card's requirement.
///
/// This is the caller-side legality check; the executor assumes it passed.
/// Range is checked separately by [`validate_range`].
pub fn validate(
    state: &CombatState,
    requirement: TargetRequirement,
    target: Option<Target>,
) -> Result<(), PlayError> {
    match requirement {
        TargetRequirement::None => Ok(()),
        TargetRequirement::Enemy => {
            let target = target.ok_or(PlayError::MissingTarget)?;
            enemy_target(state, Some(target))
                .map(|_| ())
                .ok_or(PlayError::InvalidTarget(target))
        }
        TargetRequirement::Tile => {
            let target = target.ok_or(PlayError::MissingTarget)?;
            match target.position(state) {
                Some(pos) if state.board.in_bounds(pos) => Ok(()),
                _ => Err(PlayError::InvalidTarget(target)),
            }
        }
        TargetRequirement::EmptyTile => match target.ok_or(PlayError::MissingTarget)? {
            Target::Tile(pos) => Ok(state.board.check_destination(pos)?),
            other => Err(PlayError::InvalidTarget(other)),
        },
    }
}

/// Check that `target` sits at one of the `range` offsets from `origin`.
///
/// A movement card out of range reports a [`MoveError`], like any other
/// illegal move.
pub fn validate_range(
    state: &CombatState,
    origin: Position,
    range: &OffsetTable,
    kind: CardKind,
    target: Target,
) -> Result<(), PlayError> {
    let Some(pos) = target.position(state) else {
        return Err(PlayError::InvalidTarget(target));
    };
    if range.contains(origin.delta_to(pos)) {
        return Ok(());
    }
    Err(match kind {
        CardKind::Movement => MoveError::OutOfRange { destination: pos }.into(),
        CardKind::Attack | CardKind::Skill => PlayError::OutOfRange(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::core::{EncounterSetup, EnemyTemplate, PlayerTemplate};

    fn state() -> CombatState {
        let setup = EncounterSetup::new(6, 6, PlayerTemplate::new(30, 3, Position::new(0, 2)))
            .with_enemy(EnemyTemplate::new("A", 10, 1, Position::new(2, 2)))
            .with_enemy(EnemyTemplate::new("B", 10, 1, Position::new(3, 2)))
            .with_enemy(EnemyTemplate::new("C", 10, 1, Position::new(2, 3)))
            .with_enemy(EnemyTemplate::new("D", 10, 1, Position::new(5, 5)));
        CombatState::new(&setup, &CardRegistry::new()).unwrap()
    }

    #[test]
    fn test_enemy_target_by_tile_or_id() {
        let state = state();
        assert_eq!(
            enemy_target(&state, Some(Target::Tile(Position::new(3, 2)))),
            Some(EntityId(2))
        );
        assert_eq!(enemy_target(&state, Some(EntityId(4).into())), Some(EntityId(4)));
        assert_eq!(enemy_target(&state, Some(EntityId::PLAYER.into())), None);
        assert_eq!(enemy_target(&state, Some(Target::Tile(Position::new(1, 1)))), None);
        assert_eq!(enemy_target(&state, None), None);
    }

    #[test]
    fn test_area_targets() {
        let state = state();
        let hit = area_targets(&state, Position::new(2, 2));
        assert_eq!(hit[0], EntityId(1));
        assert_eq!(hit.len(), 3);
        assert!(!hit.contains(&EntityId(4)));
    }

    #[test]
    fn test_line_targets() {
        let state = state();
        let origin = Position::new(0, 2);

        assert_eq!(
            line_targets(&state, origin, Position::new(1, 2), 3),
            vec![EntityId(1), EntityId(2)]
        );
        assert_eq!(line_targets(&state, origin, Position::new(5, 2), 2), vec![EntityId(1)]);
        assert!(line_targets(&state, origin, Position::new(2, 3), 5).is_empty());
        assert!(line_targets(&state, origin, origin, 5).is_empty());
    }

    #[test]
    fn test_validate() {
        let state = state();

        assert_eq!(
            validate(&state, TargetRequirement::Enemy, None),
            Err(PlayError::MissingTarget)
        );
        assert!(validate(&state, TargetRequirement::Enemy, Some(EntityId(1).into())).is_ok());
        assert!(validate(&state, TargetRequirement::Tile, Some(Target::Tile(Position::new(9, 0)))).is_err());
        assert!(matches!(
            validate(&state, TargetRequirement::EmptyTile, Some(Target::Tile(Position::new(2, 2)))),
            Err(PlayError::Movement(MoveError::Occupied { .. }))
        ));
        assert!(validate(&state, TargetRequirement::EmptyTile, Some(Target::Tile(Position::new(1, 1)))).is_ok());
    }

    #[test]
    fn test_validate_range() {
        let state = state();
        let origin = Position::new(0, 2);
        let reach = OffsetTable::diamond(2);

        assert!(validate_range(&state, origin, &reach, CardKind::Attack, EntityId(1).into()).is_ok());
        assert_eq!(
            validate_range(&state, origin, &reach, CardKind::Attack, EntityId(2).into()),
            Err(PlayError::OutOfRange(Target::Entity(EntityId(2))))
        );
        assert_eq!(
            validate_range(&state, origin, &reach, CardKind::Movement, Target::Tile(Position::new(2, 3))),
            Err(PlayError::Movement(MoveError::OutOfRange {
                destination: Position::new(2, 3)
            }))
        );
        assert!(validate_range(&state, origin, &reach, CardKind::Movement, Target::Tile(Position::new(1, 1))).is_ok());
    }
}
