//! Mirroring the ledger to a durable store
//!
//! Features:
//! - Hydration with silent recovery from missing or corrupt data
//! - `StoreMirror` observer that rewrites the full round list after each change
//! - Write-back on startup, so a corrupt or missing value is replaced at once

use log::{debug, info, warn};

use crate::consts::STORAGE_KEY_ROUNDS;
use crate::error::LedgerError;
use crate::ledger::{ChangeObserver, Round, RoundLedger};
use crate::platform::KvStore;
use crate::settings::LedgerSettings;

/// Read the stored rounds, falling back to an empty list
pub fn hydrate<S: KvStore>(store: &S, key: &str) -> Vec<Round> {
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            info!("No rounds found under {}, starting fresh", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Could not read rounds from {}: {}", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Round>>(&json) {
        Ok(rounds) => {
            info!("Loaded {} rounds", rounds.len());
            rounds
        }
        Err(e) => {
            warn!("Stored rounds under {} are unreadable ({}), starting fresh", key, e);
            Vec::new()
        }
    }
}

/// Writes the whole round list to one key on every change
pub struct StoreMirror<S: KvStore> {
    store: S,
    key: String,
}

impl<S: KvStore> StoreMirror<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KvStore> ChangeObserver for StoreMirror<S> {
    fn rounds_changed(&mut self, rounds: &[Round]) -> Result<(), LedgerError> {
        let json = serde_json::to_string(rounds)?;
        self.store.set(&self.key, &json)?;
        debug!("Rounds saved ({} entries)", rounds.len());
        Ok(())
    }
}

/// Build a ledger from the store and keep the store in sync with it
///
/// The hydrated state is written back once before returning.
pub fn initialize<S: KvStore + 'static>(
    store: S,
    settings: &LedgerSettings,
) -> Result<RoundLedger, LedgerError> {
    let rounds = hydrate(&store, STORAGE_KEY_ROUNDS);
    let mut ledger = RoundLedger::from_rounds(rounds, settings.tie_policy)
        .with_observer(Box::new(StoreMirror::new(store, STORAGE_KEY_ROUNDS)));
    ledger.flush()?;
    Ok(ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::ledger::{Match, Team, TiePolicy};
    use crate::platform::MemoryStore;
    use proptest::prelude::*;

    fn store_with(json: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY_ROUNDS, json).unwrap();
        store
    }

    #[test]
    fn test_missing_key_hydrates_empty() {
        let store = MemoryStore::new();
        let ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(store.raw(STORAGE_KEY_ROUNDS).unwrap(), "[]");
    }

    #[test]
    fn test_corrupt_value_hydrates_empty() {
        for bad in ["{not json", r#"{"matches":[]}"#, r#"[{"matches":[{"gamesA":1}]}]"#] {
            assert!(hydrate(&store_with(bad), STORAGE_KEY_ROUNDS).is_empty(), "{bad}");
        }
    }

    #[test]
    fn test_initialize_replaces_corrupt_value() {
        let store = store_with("garbage");
        let ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(store.raw(STORAGE_KEY_ROUNDS).unwrap(), "[]");
    }

    #[test]
    fn test_hydrate_rederives_stale_winner() {
        let store = store_with(r#"[{"matches":[{"id":"m1","gamesA":3,"gamesB":1,"winner":"B"}]}]"#);
        let ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        assert_eq!(ledger.rounds()[0].matches[0].winner(), Some(Team::A));
        assert_eq!(
            store.raw(STORAGE_KEY_ROUNDS).unwrap(),
            r#"[{"matches":[{"id":"m1","gamesA":3,"gamesB":1,"winner":"A"}]}]"#
        );
    }

    #[test]
    fn test_initialize_write_failure_propagates() {
        // the short stored form fits, its normalized write-back does not
        let mut store = MemoryStore::with_quota(64);
        store
            .set(STORAGE_KEY_ROUNDS, r#"[{"matches":[{"id":"m1"}]}]"#)
            .unwrap();
        let err = initialize(store, &LedgerSettings::default()).unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::QuotaExceeded { .. })));
    }

    #[test]
    fn test_every_change_is_mirrored() {
        let store = MemoryStore::new();
        let mut ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();

        ledger.add_round(Round::from_ids(["m1"])).unwrap();
        ledger.set_games(0, "m1", Team::A, Some(3)).unwrap();
        assert_eq!(
            store.raw(STORAGE_KEY_ROUNDS).unwrap(),
            r#"[{"matches":[{"id":"m1","gamesA":3,"gamesB":null,"winner":null}]}]"#
        );

        ledger.clear().unwrap();
        assert_eq!(store.raw(STORAGE_KEY_ROUNDS).unwrap(), "[]");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_fields_survive_mutation() {
        let store = store_with(
            r#"[{"court":2,"matches":[{"id":"m1","teamA":["ann"],"teamB":["bo"],"gamesA":null,"gamesB":null,"winner":null}]}]"#,
        );
        let mut ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        ledger.set_games(0, "m1", Team::A, Some(3)).unwrap();

        assert_eq!(ledger.rounds()[0].matches[0].extra()["teamA"], serde_json::json!(["ann"]));
        let stored: serde_json::Value =
            serde_json::from_str(&store.raw(STORAGE_KEY_ROUNDS).unwrap()).unwrap();
        assert_eq!(stored[0]["court"], 2);
        assert_eq!(stored[0]["matches"][0]["teamA"], serde_json::json!(["ann"]));
        assert_eq!(stored[0]["matches"][0]["teamB"], serde_json::json!(["bo"]));
        assert_eq!(stored[0]["matches"][0]["gamesA"], 3);
    }

    #[test]
    fn test_added_round_keeps_caller_fields() {
        let store = MemoryStore::new();
        let mut ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        let m = Match::new("m1").with_extra("teamA", serde_json::json!(["cy"]));
        ledger.add_round(Round::new(vec![m])).unwrap();

        let reloaded = initialize(store, &LedgerSettings::default()).unwrap();
        assert_eq!(reloaded.rounds()[0].matches[0].extra()["teamA"], serde_json::json!(["cy"]));
    }

    #[test]
    fn test_write_failure_propagates() {
        let store = MemoryStore::with_quota(8);
        let mut ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
        let err = ledger.add_round(Round::from_ids(["m1", "m2"])).unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::QuotaExceeded { .. })));
        // memory keeps the change even though the store lags
        assert_eq!(ledger.len(), 1);
        assert_eq!(store.raw(STORAGE_KEY_ROUNDS).unwrap(), "[]");
    }

    #[test]
    fn test_reload_restores_session() {
        let store = MemoryStore::new();
        {
            let mut ledger = initialize(store.clone(), &LedgerSettings::default()).unwrap();
            ledger.add_round(Round::from_ids(["m1", "m2"])).unwrap();
            ledger.add_round(Round::from_ids(["m3"])).unwrap();
            ledger.set_games(1, "m3", Team::B, Some(2)).unwrap();
        }
        let ledger = initialize(store, &LedgerSettings::default()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.rounds()[1].matches[0].games_b(), Some(2));
        assert_eq!(ledger.rounds()[0].matches[1].id(), "m2");
    }

    fn arb_match() -> impl Strategy<Value = Match> {
        (
            "[a-z0-9]{1,6}",
            proptest::option::of(0u32..20),
            proptest::option::of(0u32..20),
        )
            .prop_map(|(id, a, b)| Match::with_games(id, a, b, TiePolicy::FavorB))
    }

    proptest! {
        #[test]
        fn prop_serialize_then_hydrate_is_identity(
            rounds in proptest::collection::vec(
                proptest::collection::vec(arb_match(), 0..4).prop_map(Round::new),
                0..6,
            )
        ) {
            let json = serde_json::to_string(&rounds).unwrap();
            let restored = hydrate(&store_with(&json), STORAGE_KEY_ROUNDS);
            prop_assert_eq!(&restored, &rounds);

            let ledger = RoundLedger::from_rounds(restored, TiePolicy::FavorB);
            prop_assert_eq!(ledger.rounds(), rounds.as_slice());
        }
    }
}
