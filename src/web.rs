//! Browser bindings
//!
//! Exposes the ledger to JavaScript as `RoundsHandle`, backed by
//! LocalStorage. Rounds cross the boundary as JSON strings.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::ledger::{Round, Team};
use crate::platform::LocalStorage;
use crate::provider::RoundsProvider;
use crate::settings::LedgerSettings;

fn js_error(e: impl Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn parse_round(json: &str) -> Result<Round, JsValue> {
    serde_json::from_str(json).map_err(js_error)
}

#[wasm_bindgen]
pub struct RoundsHandle {
    provider: RoundsProvider,
}

#[wasm_bindgen]
impl RoundsHandle {
    /// Mount a ledger hydrated from LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<RoundsHandle, JsValue> {
        let store = LocalStorage::open().map_err(js_error)?;
        let settings = LedgerSettings::load(&store);
        let mut provider = RoundsProvider::new();
        provider.mount(store, &settings).map_err(js_error)?;
        Ok(Self { provider })
    }

    /// Rounds as a JSON array, oldest first
    pub fn rounds(&self) -> Result<String, JsValue> {
        let ledger = self.provider.use_rounds().map_err(js_error)?;
        serde_json::to_string(ledger.rounds()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = addRound)]
    pub fn add_round(&mut self, round_json: &str) -> Result<(), JsValue> {
        let round = parse_round(round_json)?;
        self.provider
            .use_rounds_mut()
            .and_then(|l| l.add_round(round))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = removeRound)]
    pub fn remove_round(&mut self, idx: usize) -> Result<(), JsValue> {
        self.provider
            .use_rounds_mut()
            .and_then(|l| l.remove_round(idx))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = replaceRound)]
    pub fn replace_round(&mut self, idx: usize, round_json: &str) -> Result<(), JsValue> {
        let round = parse_round(round_json)?;
        self.provider
            .use_rounds_mut()
            .and_then(|l| l.replace_round(idx, round))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setGames)]
    pub fn set_games(
        &mut self,
        round_idx: usize,
        match_id: &str,
        team: &str,
        games: Option<u32>,
    ) -> Result<(), JsValue> {
        let team = Team::from_str(team).ok_or_else(|| js_error(format!("unknown team {}", team)))?;
        self.provider
            .use_rounds_mut()
            .and_then(|l| l.set_games(round_idx, match_id, team, games))
            .map_err(js_error)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.provider
            .use_rounds_mut()
            .and_then(|l| l.clear())
            .map_err(js_error)
    }

    /// Tear down the session; later calls fail with a missing-provider error
    pub fn unmount(&mut self) {
        self.provider.unmount();
    }
}
