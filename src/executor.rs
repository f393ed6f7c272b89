//! The service executor: fork/exec of a resolved script with an exclusive
//! lock FIFO for other processes to rendezvous on.
use std::ffi::CString;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use nix::errno::Errno;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{self, ForkResult, Pid};
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{RcError, Result};
use crate::resolve::{basename, service_resolve};
use crate::state::{mark, state, MarkTarget, PrimaryState};

/// The argument passed to the service script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceArg {
    Start,
    Stop,
}

impl ServiceArg {
    fn as_str(self) -> &'static str {
        match self {
            ServiceArg::Start => "start",
            ServiceArg::Stop => "stop",
        }
    }
}

/// The outcome of [`exec_service`], replacing the reference's
/// `-1`/`0`/positive-pid sentinel convention with a typed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// `fork`/`mkfifo` failed.
    Failed,
    /// The script does not exist; the service was marked `STOPPED`.
    NoOp,
    /// The child was spawned with the given pid.
    Spawned(Pid),
}

/// The signals reset to their default disposition in the executor child,
/// matching the reference `_exec_service`.
const CHILD_RESET_SIGNALS: [Signal; 7] = [
    Signal::SIGCHLD,
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTERM,
    Signal::SIGUSR1,
    Signal::SIGWINCH,
];

fn exclusive_fifo_path(ctx: &Context, service: &str) -> std::path::PathBuf {
    ctx.state_subdir("exclusive").join(basename(service))
}

/// Forks a child that execs `service`'s resolved script with `arg`, after
/// atomically creating an exclusive-lock FIFO.
pub fn exec_service(ctx: &Context, service: &str, arg: ServiceArg) -> Result<ExecOutcome> {
    let resolved = match service_resolve(ctx, service) {
        Ok(path) => path,
        Err(RcError::NotFound(_)) => {
            mark(ctx, service, MarkTarget::Stopped)?;
            return Ok(ExecOutcome::NoOp);
        }
        Err(e) => return Err(e),
    };

    if !resolved.exists() {
        mark(ctx, service, MarkTarget::Stopped)?;
        return Ok(ExecOutcome::NoOp);
    }

    let fifo_dir = ctx.state_subdir("exclusive");
    fs::create_dir_all(&fifo_dir).map_err(|e| RcError::io(&fifo_dir, e))?;
    let fifo_path = exclusive_fifo_path(ctx, service);
    match unistd::mkfifo(&fifo_path, Mode::from_bits_truncate(0o600)) {
        Ok(()) => {}
        Err(Errno::EEXIST) => {}
        Err(_) => return Ok(ExecOutcome::Failed),
    }

    let full_mask = SigSet::all();
    let old_mask = match signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&full_mask), None) {
        Ok(mask) => mask,
        Err(_) => return Ok(ExecOutcome::Failed),
    };

    // SAFETY: the child only calls async-signal-safe functions (signal
    // disposition resets, sigprocmask, execv) before either execing or
    // exiting; it never returns into the rest of this Rust stack.
    let fork_result = unsafe { unistd::fork() };

    match fork_result {
        Ok(ForkResult::Child) => {
            run_child(&resolved, arg, &old_mask, &fifo_path);
            unreachable!("run_child always exits or execs");
        }
        Ok(ForkResult::Parent { child }) => {
            let _ = signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None);
            debug!(service, arg = arg.as_str(), pid = child.as_raw(), "executor spawned");
            Ok(ExecOutcome::Spawned(child))
        }
        Err(_) => {
            let _ = signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None);
            Ok(ExecOutcome::Failed)
        }
    }
}

fn run_child(script: &Path, arg: ServiceArg, old_mask: &SigSet, fifo_path: &Path) -> ! {
    for sig in CHILD_RESET_SIGNALS {
        let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        // SAFETY: installing a default disposition in a freshly forked,
        // single-threaded child is always sound.
        unsafe {
            let _ = signal::sigaction(sig, &action);
        }
    }
    let _ = signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(old_mask), None);

    let script_c = match CString::new(script.as_os_str().as_bytes()) {
        Ok(s) => s,
        Err(_) => std::process::exit(1),
    };
    let arg_c = CString::new(arg.as_str()).expect("no interior NUL");
    let argv = [script_c.clone(), arg_c];

    let exec_err = unistd::execv(&script_c, &argv).unwrap_err();
    eprintln!("unable to exec '{}': {exec_err}", script.display());
    let _ = fs::remove_file(fifo_path);
    std::process::exit(libc::EXIT_FAILURE);
}

/// Starts `name`: no-op unless the service is currently `STOPPED`.
/// `FAILED` services refuse to start.
pub fn service_start(ctx: &Context, name: &str) -> Result<ExecOutcome> {
    let current = state(ctx, name);
    if current.is_failed() {
        return Ok(ExecOutcome::Failed);
    }
    if !current.is_stopped() {
        return Ok(ExecOutcome::NoOp);
    }
    exec_service(ctx, name, ServiceArg::Start)
}

/// Stops `name`: no-op if already `STOPPED`. `FAILED` services refuse to
/// stop via this path (the reference treats a failed service as requiring
/// explicit intervention).
pub fn service_stop(ctx: &Context, name: &str) -> Result<ExecOutcome> {
    let current = state(ctx, name);
    if current.is_failed() {
        return Ok(ExecOutcome::Failed);
    }
    if current.primary == PrimaryState::Stopped {
        return Ok(ExecOutcome::NoOp);
    }
    exec_service(ctx, name, ServiceArg::Stop)
}
