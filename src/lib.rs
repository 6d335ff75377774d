//! Round Ledger - match rounds with derived winners, mirrored to a durable store
//!
//! Core modules:
//! - `ledger`: Rounds, matches, the winner rule and the mutation operations
//! - `persistence`: Hydration and store mirroring
//! - `platform`: Browser/native storage backends
//! - `provider`: Session-scoped access for consumers
//! - `settings`: Persisted configuration

pub mod error;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod provider;
pub mod settings;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{LedgerError, StoreError};
pub use ledger::{Match, Round, RoundLedger, Team, TiePolicy};
pub use provider::RoundsProvider;
pub use settings::LedgerSettings;

/// Storage constants
pub mod consts {
    /// Key the round list is mirrored under unless settings say otherwise
    pub const STORAGE_KEY_ROUNDS: &str = "match_rounds";
}
