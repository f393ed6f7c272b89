//! Core service-management library for a filesystem-rooted Unix init
//! system: the service state machine, runlevel and scheduling registries,
//! and the controlled fork/exec of service scripts.
//!
//! The library is linked into short-lived processes; it holds no
//! process-wide mutable state of its own (see [`context`]) and performs no
//! policy decisions (see `SPEC_FULL.md` §1). Coordination between
//! concurrent invocations against the same state database relies entirely
//! on the atomicity of the underlying filesystem primitives.

#![warn(unused_crate_dependencies)]

/// The execution context threaded explicitly through every call.
pub mod context;

/// The error taxonomy.
pub mod error;

/// Path joining, directory listing, and recursive removal.
pub mod paths;

/// The runlevel registry.
pub mod runlevel;

/// Resolution of a bare service name to its on-disk init script.
pub mod resolve;

/// Extraction of `opts`/`description` metadata by sourcing the script.
pub mod metadata;

/// The service state machine.
pub mod state;

/// The scheduling registry.
pub mod schedule;

/// Runlevel membership.
pub mod membership;

/// Fork/exec of service scripts with an exclusive-lock FIFO.
pub mod executor;

/// The per-service options key/value store.
pub mod options;

/// Host classification (informational).
pub mod host;


pub use context::Context;
pub use error::{RcError, Result};
