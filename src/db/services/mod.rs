//! The `services` module provides a high-level API for interacting with the
//! database. It encapsulates the query logic so the rest of the worker can
//! work with domain models without knowing the underlying schema.
//!
//! All public functions from the sub-modules are re-exported here for
//! convenient access under the `crate::db::services::` path.

pub mod probe_log_service;
pub mod target_service;

pub use probe_log_service::*;
pub use target_service::*;
