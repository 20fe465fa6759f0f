//! Card pile system.
//!
//! ## Key Types
//!
//! - `Pile`: Deck, hand, discard or exhaust
//! - `CardPiles`: Card location tracking and movement
//! - `PileSnapshot`: Read-only copy handed to presentation layers

pub mod piles;

pub use piles::{CardPiles, Draw, Pile, PilePosition, PileSnapshot};
