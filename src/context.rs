//! The execution context threaded explicitly through every call.
//!
//! Unlike a long-lived daemon, this library is linked into short-lived
//! processes and never reaches for a process-wide singleton to find its
//! root directories. Callers build one [`Context`] (or one per call, if
//! they prefer) and pass it by reference.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A shared, lockable sink for `KEY=VALUE\n` environment-delta lines.
pub type EnvironSink = Arc<Mutex<dyn Write + Send>>;

/// The four rooted directories the state database is built on, plus an
/// optional environment-output channel.
#[derive(Clone)]
pub struct Context {
    state_dir: PathBuf,
    init_dir: PathBuf,
    init_local_dir: PathBuf,
    runlevels_dir: PathBuf,
    environ_sink: Option<EnvironSink>,
}

impl Context {
    /// Builds a context rooted at the four given directories. None of them
    /// need to exist yet; components create subdirectories lazily as they
    /// are used.
    pub fn new(
        state_dir: impl Into<PathBuf>,
        init_dir: impl Into<PathBuf>,
        init_local_dir: impl Into<PathBuf>,
        runlevels_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            state_dir: state_dir.into(),
            init_dir: init_dir.into(),
            init_local_dir: init_local_dir.into(),
            runlevels_dir: runlevels_dir.into(),
            environ_sink: None,
        }
    }

    /// Attaches a shared writer that components may use to propagate
    /// `KEY=VALUE\n` environment deltas to the invoking host. The core
    /// never opens or closes this stream itself.
    pub fn with_environ_sink(mut self, sink: EnvironSink) -> Self {
        self.environ_sink = Some(sink);
        self
    }

    /// Root of the state database (`<state>`).
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Root of the primary init-script directory (`<init>`).
    pub fn init_dir(&self) -> &Path {
        &self.init_dir
    }

    /// Root of the local init-script directory (`<init_local>`).
    pub fn init_local_dir(&self) -> &Path {
        &self.init_local_dir
    }

    /// Root of the runlevel-membership directory (`<runlevels>`).
    pub fn runlevels_dir(&self) -> &Path {
        &self.runlevels_dir
    }

    /// Writes an environment delta line to the attached sink, if any.
    /// Silently a no-op when no sink is attached, matching the reference
    /// "the core neither opens nor closes this stream" contract.
    pub fn emit_environ(&self, key: &str, value: &str) -> std::io::Result<()> {
        if let Some(sink) = &self.environ_sink {
            let mut guard = sink
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            writeln!(guard, "{key}={value}")?;
        }
        Ok(())
    }

    pub(crate) fn state_subdir(&self, name: &str) -> PathBuf {
        self.state_dir.join(name)
    }
}
