//! The service state machine: the heart of the library.
//!
//! Service state is a small value object combining an enumerated primary
//! state with a set of modifier flags, rather than the raw bit-set word the
//! reference implementation uses internally (see `SPEC_FULL.md` §9,
//! "Bit-field state").
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::resolve::service_resolve;
use crate::schedule::{schedule_clear, scheduled_by};

/// The mutually exclusive primary state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryState {
    Stopped,
    Started,
    Starting,
    Stopping,
    Inactive,
}

impl PrimaryState {
    fn dir_name(self) -> &'static str {
        match self {
            PrimaryState::Stopped => "stopped",
            PrimaryState::Started => "started",
            PrimaryState::Starting => "starting",
            PrimaryState::Stopping => "stopping",
            PrimaryState::Inactive => "inactive",
        }
    }
}

/// The modifier flags that may accompany a primary state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub wasinactive: bool,
    pub coldplugged: bool,
    pub failed: bool,
    pub scheduled: bool,
}

/// The full state of a service: a primary state plus whichever modifiers
/// currently apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceState {
    pub primary: PrimaryState,
    pub modifiers: Modifiers,
}

impl ServiceState {
    /// A freshly stopped service with no modifiers set.
    pub fn stopped() -> Self {
        ServiceState {
            primary: PrimaryState::Stopped,
            modifiers: Modifiers::default(),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.primary == PrimaryState::Stopped
    }

    pub fn is_failed(&self) -> bool {
        self.modifiers.failed
    }
}

/// A value identifying one of the nine marker slots. `Scheduled` never has
/// a per-service marker of its own: it names the `<state>/scheduled/`
/// sub-tree, which is consulted instead (see [`state`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Started,
    Stopped,
    Starting,
    Stopping,
    Inactive,
    WasInactive,
    ColdPlugged,
    Failed,
    Scheduled,
}

impl MarkerState {
    /// The canonical iteration order used by both the reader (to resolve
    /// I1's "last primary wins" rule) and the sweep in [`mark`].
    pub const ALL: [MarkerState; 9] = [
        MarkerState::Started,
        MarkerState::Stopped,
        MarkerState::Starting,
        MarkerState::Stopping,
        MarkerState::Inactive,
        MarkerState::WasInactive,
        MarkerState::ColdPlugged,
        MarkerState::Failed,
        MarkerState::Scheduled,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            MarkerState::Started => "started",
            MarkerState::Stopped => "stopped",
            MarkerState::Starting => "starting",
            MarkerState::Stopping => "stopping",
            MarkerState::Inactive => "inactive",
            MarkerState::WasInactive => "wasinactive",
            MarkerState::ColdPlugged => "coldplugged",
            MarkerState::Failed => "failed",
            MarkerState::Scheduled => "scheduled",
        }
    }

    fn primary(self) -> Option<PrimaryState> {
        match self {
            MarkerState::Started => Some(PrimaryState::Started),
            MarkerState::Stopped => Some(PrimaryState::Stopped),
            MarkerState::Starting => Some(PrimaryState::Starting),
            MarkerState::Stopping => Some(PrimaryState::Stopping),
            MarkerState::Inactive => Some(PrimaryState::Inactive),
            _ => None,
        }
    }
}

/// The target state passed to [`mark`]. A superset of [`PrimaryState`]
/// since `ColdPlugged` and `Failed` may be marked without displacing the
/// current primary state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkTarget {
    Stopped,
    Started,
    Starting,
    Stopping,
    Inactive,
    ColdPlugged,
    Failed,
}

impl MarkTarget {
    fn marker(self) -> MarkerState {
        match self {
            MarkTarget::Stopped => MarkerState::Stopped,
            MarkTarget::Started => MarkerState::Started,
            MarkTarget::Starting => MarkerState::Starting,
            MarkTarget::Stopping => MarkerState::Stopping,
            MarkTarget::Inactive => MarkerState::Inactive,
            MarkTarget::ColdPlugged => MarkerState::ColdPlugged,
            MarkTarget::Failed => MarkerState::Failed,
        }
    }
}

fn marker_path(ctx: &Context, marker: MarkerState, service: &str) -> std::path::PathBuf {
    ctx.state_subdir(marker.dir_name()).join(service)
}

fn marker_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Reads the current state of `service` by testing existence of each of the
/// nine marker slots, in the canonical order of [`MarkerState::ALL`].
///
/// If more than one primary marker is transiently observed (I1), the last
/// one seen in canonical order wins, matching the reference reader's
/// straight-line overwrite loop.
pub fn state(ctx: &Context, service: &str) -> ServiceState {
    let mut primary = PrimaryState::Stopped;
    let mut modifiers = Modifiers::default();

    for marker in MarkerState::ALL {
        if marker == MarkerState::Scheduled {
            continue;
        }
        let exists = marker_exists(&marker_path(ctx, marker, service));
        if !exists {
            continue;
        }
        match marker {
            MarkerState::WasInactive => modifiers.wasinactive = true,
            MarkerState::ColdPlugged => modifiers.coldplugged = true,
            MarkerState::Failed => modifiers.failed = true,
            _ => {
                if let Some(p) = marker.primary() {
                    primary = p;
                }
            }
        }
    }

    if primary == PrimaryState::Stopped {
        let scheduled = !scheduled_by(ctx, service).unwrap_or_default().is_empty();
        modifiers.scheduled = scheduled;
    }

    ServiceState { primary, modifiers }
}

/// Transitions `service` towards `target`, mutating the symlink set per the
/// reference `rc_service_mark` algorithm. Returns `Ok(true)` if every
/// filesystem mutation succeeded, `Ok(false)` if a non-fatal partial
/// failure occurred (mirroring the reference's boolean-with-errno
/// convention folded into this crate's `Result`-based one), and `Err` if
/// the service does not resolve at all.
pub fn mark(ctx: &Context, service: &str, target: MarkTarget) -> Result<bool> {
    let resolved = service_resolve(ctx, service)?;
    let resolved_str = resolved.to_string_lossy().into_owned();

    let previous = state(ctx, service);
    let mut ok = true;

    let mut skip_marker = None;
    if !matches!(target, MarkTarget::Stopped) {
        let marker = target.marker();
        let path = marker_path(ctx, marker, service);
        let _ = fs::remove_file(&path);
        if let Err(e) = symlink(&resolved_str, &path) {
            debug!(service, target = marker.dir_name(), error = %e, "failed to create state marker");
            return Ok(false);
        }
        skip_marker = Some(marker);
    }

    if matches!(target, MarkTarget::ColdPlugged | MarkTarget::Failed) {
        debug!(service, target = ?target, "marked modifier-only state");
        return Ok(true);
    }

    let entering_from_inactive_transition = previous.primary == PrimaryState::Inactive
        && matches!(target, MarkTarget::Starting | MarkTarget::Stopping);

    let mut skip_wasinactive = false;
    if entering_from_inactive_transition {
        let wasinactive_path = marker_path(ctx, MarkerState::WasInactive, service);
        let _ = fs::remove_file(&wasinactive_path);
        if symlink(&resolved_str, &wasinactive_path).is_ok() {
            skip_wasinactive = true;
        } else {
            ok = false;
        }
    }

    for marker in MarkerState::ALL {
        if marker == MarkerState::Stopped
            || marker == MarkerState::ColdPlugged
            || marker == MarkerState::Scheduled
        {
            continue;
        }
        if Some(marker) == skip_marker {
            continue;
        }
        if skip_wasinactive && marker == MarkerState::WasInactive {
            continue;
        }
        let path = marker_path(ctx, marker, service);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!(service, marker = marker.dir_name(), error = %e, "failed to sweep marker");
                ok = false;
            }
        }
    }

    if matches!(
        target,
        MarkTarget::Started | MarkTarget::Stopped | MarkTarget::Inactive
    ) {
        let _ = fs::remove_file(ctx.state_subdir("exclusive").join(service));
    }

    if matches!(target, MarkTarget::Stopped) {
        crate::paths::remove_tree(&ctx.state_subdir("options").join(service), true)?;
        crate::paths::remove_tree(&ctx.state_subdir("daemons").join(service), true)?;
        crate::paths::remove_tree(&ctx.state_subdir("scheduled").join(service), true)?;
        schedule_clear(ctx, service)?;
    }

    if matches!(target, MarkTarget::Started | MarkTarget::Stopped) {
        prune_schedule_entries_targeting(ctx, service)?;
    }

    debug!(service, target = ?target, ok, "marked service state");
    Ok(ok)
}

fn prune_schedule_entries_targeting(ctx: &Context, service: &str) -> Result<()> {
    let scheduled_root = ctx.state_subdir("scheduled");
    let triggers = match fs::read_dir(&scheduled_root) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(_) => return Ok(()),
    };

    for trigger in triggers.flatten() {
        let trigger_dir = trigger.path();
        if !trigger_dir.is_dir() {
            continue;
        }
        let dependent_path = trigger_dir.join(service);
        let _ = fs::remove_file(&dependent_path);
        crate::paths::rmdir_best_effort(&trigger_dir);
    }
    Ok(())
}
