//! Runlevel membership: symlinks under `<runlevels>/<level>/` pointing at
//! init scripts.
use std::fs;
use std::os::unix::fs::symlink;

use tracing::debug;

use crate::context::Context;
use crate::error::{RcError, Result};
use crate::paths::{list_dir, EntryFilter};
use crate::resolve::{basename, service_resolve};
use crate::runlevel::{runlevel_exists, BOOT, SINGLE, SYSINIT};
use crate::state::MarkerState;

/// Whether `service` is a member of `level`.
pub fn service_in_runlevel(ctx: &Context, service: &str, level: &str) -> bool {
    ctx.runlevels_dir()
        .join(level)
        .join(basename(service))
        .symlink_metadata()
        .is_ok()
}

/// Adds `service` to `level`. Fails with *not-found* if `level` does not
/// exist, *already-exists* if the membership is already present, and
/// *permission-denied* if `level` is the boot runlevel and `service` does
/// not resolve to a script living directly in `<init>`.
pub fn service_add(ctx: &Context, level: &str, service: &str) -> Result<()> {
    if !runlevel_exists(ctx, level) {
        return Err(RcError::not_found(format!("runlevel '{level}'")));
    }

    if service_in_runlevel(ctx, service, level) {
        return Err(RcError::already_exists(format!(
            "service '{service}' in runlevel '{level}'"
        )));
    }

    let resolved = service_resolve(ctx, service)?;

    if level == BOOT {
        let real_dir = resolved
            .parent()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.to_path_buf()))
            .unwrap_or_default();
        let init_dir = ctx
            .init_dir()
            .canonicalize()
            .unwrap_or_else(|_| ctx.init_dir().to_path_buf());
        if real_dir != init_dir {
            return Err(RcError::permission_denied(format!(
                "service '{service}' is not installed in the primary init directory"
            )));
        }
    }

    let name = basename(service);
    let link = ctx.runlevels_dir().join(level).join(name);
    symlink(&resolved, &link).map_err(|e| RcError::io(&link, e))?;
    debug!(level, service, "added to runlevel");
    Ok(())
}

/// Removes `service` from `level`. Success iff the unlink succeeded.
pub fn service_delete(ctx: &Context, level: &str, service: &str) -> Result<()> {
    let link = ctx.runlevels_dir().join(level).join(basename(service));
    fs::remove_file(&link).map_err(|e| RcError::io(&link, e))?;
    debug!(level, service, "removed from runlevel");
    Ok(())
}

/// Lists the services belonging to `level`. Absent `level` means the union
/// of `<init>` and `<init_local>`; the pseudo-runlevels `sysinit`/`single`
/// are always empty.
pub fn services_in_runlevel(ctx: &Context, level: Option<&str>) -> Result<Vec<String>> {
    match level {
        None => {
            let mut names = list_dir(ctx.init_dir(), EntryFilter::InitScript)?;
            names.extend(list_dir(ctx.init_local_dir(), EntryFilter::InitScript)?);
            names.sort();
            names.dedup();
            Ok(names)
        }
        Some(level) if level == SYSINIT || level == SINGLE => Ok(Vec::new()),
        Some(level) => list_dir(&ctx.runlevels_dir().join(level), EntryFilter::InitScript),
    }
}

/// Lists the services that currently carry the given marker state.
/// `Scheduled` has a two-level layout: the union (sorted, unique) across
/// every trigger directory is returned.
pub fn services_in_state(ctx: &Context, marker: MarkerState) -> Result<Vec<String>> {
    if marker == MarkerState::Scheduled {
        let root = ctx.state_subdir("scheduled");
        let triggers = match fs::read_dir(&root) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RcError::io(&root, e)),
        };
        let mut names = Vec::new();
        for trigger in triggers {
            let trigger = trigger.map_err(|e| RcError::io(&root, e))?;
            if trigger.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                names.extend(list_dir(&trigger.path(), EntryFilter::InitScript)?);
            }
        }
        names.sort();
        names.dedup();
        return Ok(names);
    }

    list_dir(&ctx.state_subdir(marker.dir_name()), EntryFilter::InitScript)
}
