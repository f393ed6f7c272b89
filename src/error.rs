//! Error handling for rc-core.
use std::path::PathBuf;
use thiserror::Error;

/// Defines all possible errors that can occur while operating on the service
/// state database.
#[derive(Debug, Error)]
pub enum RcError {
    /// Named service, runlevel, or state entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempt to re-add an existing membership or marker where idempotency
    /// is not defined.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Boot-level addition from outside `<init>`, or an underlying `EACCES`.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other underlying filesystem or subprocess error.
    #[error("I/O failure at {path}: {source}")]
    Io {
        /// The path the failing operation was performed against, when known.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// `exec` failure in the executor child.
    #[error("unable to exec '{script}': {source}")]
    ScriptFailed {
        /// The script that failed to exec.
        script: PathBuf,
        /// The underlying errno.
        #[source]
        source: nix::errno::Errno,
    },

    /// A `fork`, `mkfifo`, or signal-mask syscall failed outside the child.
    #[error("errno: {0}")]
    Errno(#[from] nix::errno::Errno),
}

impl RcError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RcError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        RcError::NotFound(what.into())
    }

    pub(crate) fn already_exists(what: impl Into<String>) -> Self {
        RcError::AlreadyExists(what.into())
    }

    pub(crate) fn permission_denied(what: impl Into<String>) -> Self {
        RcError::PermissionDenied(what.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RcError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        RcError::io(
            PathBuf::new(),
            std::io::Error::other(format!("lock poisoned: {err}")),
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RcError>;
