//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the single process-wide auth container; `auth` is the
//! read-only snapshot it publishes to the UI, and `notice` holds the
//! error toasts raised by the request pipeline.

pub mod auth;
pub mod notice;
pub mod session;
