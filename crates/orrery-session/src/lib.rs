//! Session lifecycle management for an external physics engine.
//!
//! [`SessionManager`] owns one engine session at a time: it constructs
//! the engine through an [`EngineFactory`](orrery_core::EngineFactory),
//! spawns a background worker that steps the engine at a configurable
//! rate, and serves status, object-creation, and export requests from
//! the controller side while the worker runs. The console log and the
//! sample tracker are shared with the worker and safe to read at any
//! time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod manager;
mod worker;

pub use config::SessionConfig;
pub use error::SessionError;
pub use manager::{SessionManager, StartReport, StopReport};
