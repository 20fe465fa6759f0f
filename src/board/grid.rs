//! Board grid: tile storage, occupancy and adjacency queries.

use std::collections::VecDeque;

use tracing::trace;

use super::position::{OffsetTable, Position};
use super::tile::{Tile, Trap};
use crate::core::EntityId;
use crate::elements::Element;

/// Movement or placement rejected by the board.
///
/// A rejected move leaves the board untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("destination {destination} is out of bounds")]
    OutOfBounds { destination: Position },

    #[error("destination {destination} is occupied by {occupant}")]
    Occupied {
        destination: Position,
        occupant: EntityId,
    },

    #[error("{entity} is not standing on {position}")]
    NotAtOrigin { entity: EntityId, position: Position },

    #[error("destination {destination} is outside the allowed range")]
    OutOfRange { destination: Position },
}

impl MoveError {
    /// Movement errors never corrupt state; the caller may pick another tile.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, MoveError::NotAtOrigin { .. })
    }
}

/// Rectangular tile grid.
///
/// ```
/// use card_battler::board::{Board, OffsetTable, Position};
/// use card_battler::core::EntityId;
///
/// let mut board = Board::new(5, 5, OffsetTable::four_neighbor());
/// board.place(EntityId(1), Position::new(2, 2)).unwrap();
///
/// assert!(board.is_occupied(Position::new(2, 2)));
/// assert_eq!(board.adjacent_tiles(Position::new(0, 0)).len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    adjacency: OffsetTable,
}

impl Board {
    /// Create an empty board. `adjacency` defines what "adjacent" means for
    /// every query that does not supply its own table.
    #[must_use]
    pub fn new(width: u32, height: u32, adjacency: OffsetTable) -> Self {
        let width = width as i32;
        let height = height as i32;
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(Position::new(x, y))))
            .collect();
        Self {
            width,
            height,
            tiles,
            adjacency,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    #[must_use]
    pub fn adjacency(&self) -> &OffsetTable {
        &self.adjacency
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    #[must_use]
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    pub fn tile_at_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |idx| &mut self.tiles[idx])
    }

    /// Out-of-bounds positions are never occupied.
    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some_and(Tile::is_occupied)
    }

    #[must_use]
    pub fn occupant_at(&self, pos: Position) -> Option<EntityId> {
        self.tile_at(pos).and_then(|tile| tile.occupant)
    }

    /// In-bounds tiles adjacent to `pos` under the board's adjacency table.
    #[must_use]
    pub fn adjacent_tiles(&self, pos: Position) -> Vec<&Tile> {
        self.tiles_around(pos, &self.adjacency)
    }

    /// In-bounds tiles reached from `pos` through an arbitrary table, in
    /// table order.
    #[must_use]
    pub fn tiles_around(&self, pos: Position, table: &OffsetTable) -> Vec<&Tile> {
        table.around(pos).filter_map(|p| self.tile_at(p)).collect()
    }

    /// In-bounds positions adjacent to `pos`, in table order.
    #[must_use]
    pub fn adjacent_positions(&self, pos: Position) -> Vec<Position> {
        self.adjacency
            .around(pos)
            .filter(|&p| self.in_bounds(p))
            .collect()
    }

    /// Step counts to `goal` under the board's adjacency table, ignoring
    /// occupants. Tiles that cannot reach `goal` have no distance.
    #[must_use]
    pub fn distances_to(&self, goal: Position) -> DistanceField {
        let mut distances = vec![None; self.tiles.len()];
        let Some(start) = self.index(goal) else {
            return DistanceField { width: self.width, height: self.height, distances };
        };
        distances[start] = Some(0);

        // Walk offsets backwards: `pos` is one step from `next` when
        // `pos + delta == next`.
        let mut queue = VecDeque::from([goal]);
        while let Some(next) = queue.pop_front() {
            let Some(step) = self.index(next).and_then(|idx| distances[idx]) else {
                continue;
            };
            for delta in self.adjacency.iter() {
                let pos = Position::new(next.x - delta.x, next.y - delta.y);
                if let Some(idx) = self.index(pos) {
                    if distances[idx].is_none() {
                        distances[idx] = Some(step + 1);
                        queue.push_back(pos);
                    }
                }
            }
        }
        DistanceField { width: self.width, height: self.height, distances }
    }

    /// In-bounds positions within Manhattan `radius` of `origin`, excluding
    /// `origin` itself, in row-major order.
    #[must_use]
    pub fn positions_within(&self, origin: Position, radius: u32) -> Vec<Position> {
        self.tiles
            .iter()
            .map(|tile| tile.position)
            .filter(|&p| p != origin && p.manhattan(origin) <= radius)
            .collect()
    }

    /// Check a destination without mutating anything.
    pub fn check_destination(&self, destination: Position) -> Result<(), MoveError> {
        let tile = self
            .tile_at(destination)
            .ok_or(MoveError::OutOfBounds { destination })?;
        match tile.occupant {
            Some(occupant) => Err(MoveError::Occupied {
                destination,
                occupant,
            }),
            None => Ok(()),
        }
    }

    /// Put an entity on an empty tile.
    pub fn place(&mut self, entity: EntityId, pos: Position) -> Result<(), MoveError> {
        self.check_destination(pos)?;
        if let Some(tile) = self.tile_at_mut(pos) {
            tile.occupant = Some(entity);
        }
        Ok(())
    }

    /// Move an entity between tiles. Either both tiles change or neither does.
    pub fn move_entity(
        &mut self,
        entity: EntityId,
        from: Position,
        to: Position,
    ) -> Result<(), MoveError> {
        if self.occupant_at(from) != Some(entity) {
            return Err(MoveError::NotAtOrigin {
                entity,
                position: from,
            });
        }
        self.check_destination(to)?;

        if let Some(tile) = self.tile_at_mut(from) {
            tile.occupant = None;
        }
        if let Some(tile) = self.tile_at_mut(to) {
            tile.occupant = Some(entity);
        }
        trace!(%entity, %from, %to, "moved");
        Ok(())
    }

    /// Clear a tile's occupant, returning who was there.
    pub fn vacate(&mut self, pos: Position) -> Option<EntityId> {
        self.tile_at_mut(pos).and_then(|tile| tile.occupant.take())
    }

    /// Leave element residue on a tile. Returns false when out of bounds.
    pub fn add_residue(&mut self, pos: Position, element: Element, cap: usize) -> bool {
        match self.tile_at_mut(pos) {
            Some(tile) => {
                tile.residue.insert(element, cap);
                true
            }
            None => false,
        }
    }

    /// Consume residue of `element` from a tile.
    pub fn take_residue(&mut self, pos: Position, element: Element) -> bool {
        self.tile_at_mut(pos)
            .is_some_and(|tile| tile.residue.remove(element))
    }

    /// Install a trap, replacing any existing one.
    pub fn set_trap(&mut self, pos: Position, trap: Trap) -> bool {
        match self.tile_at_mut(pos) {
            Some(tile) => {
                tile.trap = Some(trap);
                true
            }
            None => false,
        }
    }
}

/// Per-tile step counts produced by [`Board::distances_to`].
#[derive(Clone, Debug)]
pub struct DistanceField {
    width: i32,
    height: i32,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Steps from `pos` to the goal, or `None` when out of bounds or
    /// unreachable.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<u32> {
        if !((0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)) {
            return None;
        }
        self.distances[(pos.y * self.width + pos.x) as usize]
    }
}
