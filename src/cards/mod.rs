//! Card system: definitions, instances, registry and the starter catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardKind`: Attack, Skill or Movement
//! - `CardDefinition`: Static, data-driven card record
//! - `CardInstance`: One copy of a definition in the player's deck
//! - `CardRegistry`: Card definition lookup

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardKind};
pub use instance::CardInstance;
pub use registry::{CardRegistry, RegistryError};
