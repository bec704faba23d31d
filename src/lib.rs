//! # lll-futures
//!
//! Leptos + WASM single-page client for the LL&L Futures prediction market.
//!
//! Pages, components and reactive state live here; the session store,
//! wallet context, API client and readiness gate come from the `platform`
//! crate and are bound to browser APIs in `net::browser`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: set up console logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
