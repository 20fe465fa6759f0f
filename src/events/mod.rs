//! Presentation notifications.
//!
//! ## Key Types
//!
//! - `CombatEvent`: One fire-and-forget notification
//! - `EventSink`: Receiver injected into the encounter
//! - `NullSink` / `EventLog`: Discarding and recording sinks
//!
//! Events are buffered on the combat state while a command resolves and
//! flushed to the sink once it commits.

pub mod event;
pub mod sink;

pub use event::CombatEvent;
pub use sink::{EventLog, EventSink, NullSink};
