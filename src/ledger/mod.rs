//! Round ledger core
//!
//! - `state`: matches, rounds and the winner rule
//! - `ops`: the ledger container and its mutation operations

pub mod ops;
pub mod state;

pub use ops::{ChangeObserver, RoundLedger, Snapshot};
pub use state::{Match, Round, Team, TiePolicy, calc_winner};
