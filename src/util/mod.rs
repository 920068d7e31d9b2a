//! Collaborator seams shared by the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, toasts,
//! router) behind small traits so the session, pipeline, and guard stay
//! testable without a browser.

#[cfg(feature = "csr")]
pub mod gate;
pub mod navigator;
pub mod notify;
pub mod storage;
