//! Buff/status ledger.
//!
//! The ledger is the only path through which the damage pipeline and the
//! turn state machine read or write status. Presentation layers receive
//! `LedgerSnapshot`s, never the ledger itself.

mod ledger;

pub use ledger::{BuffKey, BuffKind, BuffLedger, BuffValue, LedgerSnapshot};
