//! Ledger settings and preferences
//!
//! Persisted separately from the rounds, in the same store. The rounds key
//! itself is fixed (`consts::STORAGE_KEY_ROUNDS`) and not configurable.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::TiePolicy;
use crate::platform::KvStore;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LedgerSettings {
    /// How equal game counts are resolved
    pub tie_policy: TiePolicy,
}

impl LedgerSettings {
    /// Store key for the settings themselves
    pub const STORAGE_KEY: &'static str = "match_rounds_settings";

    /// Load settings from the store, defaults if absent or unreadable
    pub fn load<S: KvStore>(store: &S) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings from store");
                return settings;
            }
            log::warn!("Stored settings are unreadable, using defaults");
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KvStore>(&self, store: &mut S) -> Result<(), LedgerError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
