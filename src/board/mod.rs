//! Board model: tiles, occupancy and adjacency.
//!
//! ## Key Types
//!
//! - `Position`: Integer grid coordinate
//! - `OffsetTable`: Ordered relative offsets (adjacency, ranges)
//! - `Tile`: Occupant reference, element residue, optional trap
//! - `Board`: The grid itself
//!
//! Adjacency comes from a configurable `OffsetTable`, so 4-neighbour,
//! 8-neighbour, hex and card-specific range tables all go through the same
//! queries.

pub mod grid;
pub mod position;
pub mod tile;

pub use grid::{Board, DistanceField, MoveError};
pub use position::{OffsetTable, Position};
pub use tile::{Tile, Trap, TrapTrigger};
