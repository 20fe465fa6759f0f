//! Element tags and the reaction engine.
//!
//! ## Key Types
//!
//! - `Element`: Fire, Water, Ice, Thunder, Wood
//! - `ElementSet`: Insertion-ordered tag set with a configurable cap
//! - `ElementStrategy`: Stateless per-element reaction behavior
//! - `Reaction`: A resolved pairwise combo

pub mod element;
pub mod reaction;

pub use element::{Element, ElementSet};
pub use reaction::{
    start_of_turn, strategy, ElementStrategy, PartnerSource, Reaction, ReactionOutcome,
};
