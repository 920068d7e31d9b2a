//! # citation-client
//!
//! Browser client core for the paper-citation service.
//!
//! This crate owns the session/authorization core: the process-wide session
//! container, the request pipeline that attaches credentials and classifies
//! failures, and the navigation guard that gates routes by auth state. The
//! Leptos UI shell and browser bindings (gloo-net, localStorage, router) are
//! compiled only with the `csr` feature.

pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
pub mod app;

#[cfg(test)]
pub(crate) mod testing;

/// WASM entry point: install logging and mount the application.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
