//! Card effects: what a card does, who it may target, and how it resolves.
//!
//! ## Key Types
//!
//! - `CardEffect`: Bound effect of a card definition, grouped by card kind
//! - `Target`: Entity or tile chosen by the player
//! - `TargetRequirement`: What a card needs selected before it can be played
//! - `execute`: Applies one card's effect to the combat state

pub mod effect;
pub mod executor;
pub mod targeting;

pub use effect::{AttackEffect, CardEffect, MovementEffect, SkillEffect, TargetRequirement};
pub use executor::{execute, EffectReport, EffectResult};
pub use targeting::Target;
