//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `pipeline` wraps every outbound call (credential header, envelope unwrap,
//! failure classification) on top of a `transport`. `auth` and `papers` are
//! thin endpoint modules, and `types` defines the shared wire schema.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod events;
pub mod papers;
pub mod pipeline;
pub mod transport;
pub mod types;
