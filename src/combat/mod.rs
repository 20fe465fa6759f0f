//! Damage resolution.
//!
//! ## Key Types
//!
//! - `DamageRequest`: One hit to resolve
//! - `DamageOutcome`: What the hit did
//! - `resolve_damage`: The fixed-order pipeline

pub mod damage;

pub use damage::{attack_damage, is_melee, resolve_damage, DamageOutcome, DamageRequest};
