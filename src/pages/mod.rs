//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Form validation and message helpers are plain functions compiled for
//! every target; the Leptos components themselves are `csr`-only.


pub mod home;
pub mod login;

use crate::net::error::ApiError;

/// Inline message for a failed page action.
///
/// Transport failures were already surfaced as notices by the request
/// pipeline; business and decode failures were not, so the page shows them.
pub fn failure_message(err: &ApiError) -> Option<String> {
    (!err.is_transport()).then(|| err.to_string())
}
