//! Grid coordinates and offset tables.
//!
//! Geometry is never hardcoded: adjacency, enemy attack ranges and card
//! ranges are all expressed as an `OffsetTable` applied to a `Position`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Integer grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    #[must_use]
    pub const fn offset(self, delta: Position) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Offset that takes `self` to `other`.
    #[must_use]
    pub const fn delta_to(self, other: Position) -> Position {
        Position::new(other.x - self.x, other.y - self.y)
    }

    /// Manhattan distance.
    #[must_use]
    pub const fn manhattan(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Unit step along each axis towards `other` (0 where aligned).
    #[must_use]
    pub const fn direction_to(self, other: Position) -> Position {
        Position::new((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered set of relative offsets.
///
/// Order matters: when several candidates tie (enemy pathing, chill
/// targets), the earlier offset wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable(SmallVec<[Position; 8]>);

impl OffsetTable {
    /// Build a table from raw offsets.
    pub fn new(offsets: impl IntoIterator<Item = Position>) -> Self {
        Self(offsets.into_iter().collect())
    }

    /// Orthogonal neighbours.
    #[must_use]
    pub fn four_neighbor() -> Self {
        Self::new([
            Position::new(0, -1),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(-1, 0),
        ])
    }

    /// Orthogonal and diagonal neighbours.
    #[must_use]
    pub fn eight_neighbor() -> Self {
        Self::new([
            Position::new(0, -1),
            Position::new(1, -1),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(-1, 1),
            Position::new(-1, 0),
            Position::new(-1, -1),
        ])
    }

    /// Axial-coordinate hex neighbours.
    #[must_use]
    pub fn hex_six() -> Self {
        Self::new([
            Position::new(1, 0),
            Position::new(1, -1),
            Position::new(0, -1),
            Position::new(-1, 0),
            Position::new(-1, 1),
            Position::new(0, 1),
        ])
    }

    /// Straight line of `length` tiles along each orthogonal axis.
    #[must_use]
    pub fn cross(length: i32) -> Self {
        let mut offsets = SmallVec::new();
        for step in 1..=length {
            offsets.push(Position::new(0, -step));
            offsets.push(Position::new(step, 0));
            offsets.push(Position::new(0, step));
            offsets.push(Position::new(-step, 0));
        }
        Self(offsets)
    }

    /// Every offset within Manhattan `radius`, excluding the origin, in
    /// row-major order.
    #[must_use]
    pub fn diamond(radius: i32) -> Self {
        let mut offsets = SmallVec::new();
        for y in -radius..=radius {
            for x in -radius..=radius {
                let delta = Position::new(x, y);
                if delta != Position::default() && delta.manhattan(Position::default()) <= radius as u32 {
                    offsets.push(delta);
                }
            }
        }
        Self(offsets)
    }

    /// Does the table contain `delta`?
    #[must_use]
    pub fn contains(&self, delta: Position) -> bool {
        self.0.contains(&delta)
    }

    /// Iterate offsets in table order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().copied()
    }

    /// Positions reached by applying every offset to `origin`.
    pub fn around(&self, origin: Position) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().map(move |&delta| origin.offset(delta))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::four_neighbor()
    }
}
