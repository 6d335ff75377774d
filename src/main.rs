//! Round Ledger entry point
//!
//! Handles platform-specific initialization. On native this is a small CLI
//! over a directory-backed store; on the web the page drives `RoundsHandle`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Round ledger ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use round_ledger::cli::{self, Command, DEFAULT_DIR, DIR_ENV};
    use round_ledger::platform::FileStore;
    use std::process::ExitCode;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dir = std::env::var(DIR_ENV).unwrap_or_else(|_| DEFAULT_DIR.to_string());
    log::debug!("Using store directory {}", dir);

    match Command::parse(&args).and_then(|command| cli::run(command, FileStore::new(dir))) {
        Ok(out) => {
            println!("{}", out.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
