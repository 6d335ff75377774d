//! Session-scoped access to the round ledger
//!
//! A `RoundsProvider` owns at most one ledger. Consumers receive the provider
//! explicitly and ask it for the ledger; asking while nothing is mounted is a
//! wiring bug and fails with `LedgerError::MissingProvider`.

use crate::error::LedgerError;
use crate::ledger::RoundLedger;
use crate::persistence;
use crate::platform::KvStore;
use crate::settings::LedgerSettings;

#[derive(Debug, Default)]
pub struct RoundsProvider {
    ledger: Option<RoundLedger>,
}

impl RoundsProvider {
    /// Provider with nothing mounted
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a ledger from `store` and mount it, replacing any previous one
    pub fn mount<S: KvStore + 'static>(
        &mut self,
        store: S,
        settings: &LedgerSettings,
    ) -> Result<&mut RoundLedger, LedgerError> {
        let ledger = persistence::initialize(store, settings)?;
        Ok(self.mount_ledger(ledger))
    }

    pub fn mount_ledger(&mut self, ledger: RoundLedger) -> &mut RoundLedger {
        if self.ledger.is_some() {
            log::warn!("Replacing an already mounted round ledger");
        }
        self.ledger.insert(ledger)
    }

    /// Tear the session down, handing back its ledger
    pub fn unmount(&mut self) -> Option<RoundLedger> {
        self.ledger.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn use_rounds(&self) -> Result<&RoundLedger, LedgerError> {
        self.ledger.as_ref().ok_or(LedgerError::MissingProvider)
    }

    pub fn use_rounds_mut(&mut self) -> Result<&mut RoundLedger, LedgerError> {
        self.ledger.as_mut().ok_or(LedgerError::MissingProvider)
    }

    /// Mount for the duration of `f`, then tear down
    pub fn with_session<S, R>(
        store: S,
        settings: &LedgerSettings,
        f: impl FnOnce(&mut RoundsProvider) -> R,
    ) -> Result<R, LedgerError>
    where
        S: KvStore + 'static,
    {
        let mut provider = Self::new();
        provider.mount(store, settings)?;
        let out = f(&mut provider);
        provider.unmount();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STORAGE_KEY_ROUNDS;
    use crate::ledger::{Round, Team};
    use crate::platform::MemoryStore;

    #[test]
    fn test_use_outside_provider_fails() {
        let mut provider = RoundsProvider::new();
        let err = provider.use_rounds().unwrap_err();
        assert!(matches!(err, LedgerError::MissingProvider));
        assert_eq!(
            err.to_string(),
            "round ledger must be used inside a RoundsProvider"
        );
        assert!(provider.use_rounds_mut().is_err());
    }

    #[test]
    fn test_mount_use_unmount() {
        let store = MemoryStore::new();
        let mut provider = RoundsProvider::new();
        provider.mount(store.clone(), &LedgerSettings::default()).unwrap();
        assert!(provider.is_mounted());

        let ledger = provider.use_rounds_mut().unwrap();
        ledger.add_round(Round::from_ids(["m1"])).unwrap();
        ledger.set_games(0, "m1", Team::B, Some(1)).unwrap();
        assert_eq!(provider.use_rounds().unwrap().len(), 1);

        let ledger = provider.unmount().unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(matches!(provider.use_rounds(), Err(LedgerError::MissingProvider)));
        assert!(store.raw(STORAGE_KEY_ROUNDS).is_some());
    }

    #[test]
    fn test_with_session_persists_across_sessions() {
        let store = MemoryStore::new();
        let settings = LedgerSettings::default();

        RoundsProvider::with_session(store.clone(), &settings, |p| {
            let ledger = p.use_rounds_mut()?;
            ledger.add_round(Round::from_ids(["m1"]))?;
            ledger.add_round(Round::from_ids(["m2"]))
        })
        .unwrap()
        .unwrap();

        let ids = RoundsProvider::with_session(store, &settings, |p| {
            p.use_rounds().map(|ledger| {
                ledger
                    .rounds()
                    .iter()
                    .map(|r| r.matches[0].id().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .unwrap()
        .unwrap();
        assert_eq!(ids, ["m1", "m2"]);
    }

    #[test]
    fn test_clear_reflected_in_store() {
        let store = MemoryStore::new();
        let mut provider = RoundsProvider::new();
        let ledger = provider
            .mount(store.clone(), &LedgerSettings::default())
            .unwrap();
        ledger.add_round(Round::from_ids(["m1"])).unwrap();
        ledger.clear().unwrap();
        assert!(ledger.rounds().is_empty());
        assert_eq!(store.raw(STORAGE_KEY_ROUNDS).unwrap(), "[]");
    }
}
