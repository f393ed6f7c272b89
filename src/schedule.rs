//! The scheduling registry: `<state>/scheduled/<trigger>/<dependent>`.
use std::fs;
use std::os::unix::fs::symlink;
use std::path::PathBuf;

use tracing::debug;

use crate::context::Context;
use crate::error::{RcError, Result};
use crate::paths::{list_dir, remove_tree, EntryFilter};
use crate::resolve::{service_exists, service_resolve};

fn scheduled_root(ctx: &Context) -> PathBuf {
    ctx.state_subdir("scheduled")
}

/// Records that `dependent` should be started the next time `trigger`
/// changes state. Idempotent: a pre-existing entry is success.
pub fn schedule_start(ctx: &Context, trigger: &str, dependent: &str) -> Result<bool> {
    if !service_exists(ctx, dependent) {
        return Err(RcError::not_found(format!("service '{dependent}'")));
    }

    let trigger_dir = scheduled_root(ctx).join(trigger);
    fs::create_dir_all(&trigger_dir).map_err(|e| RcError::io(&trigger_dir, e))?;

    let resolved = service_resolve(ctx, dependent)?;
    let link = trigger_dir.join(dependent);
    if fs::symlink_metadata(&link).is_ok() {
        debug!(trigger, dependent, "schedule entry already present");
        return Ok(true);
    }

    match symlink(&resolved, &link) {
        Ok(()) => {
            debug!(trigger, dependent, "schedule entry created");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(true),
        Err(e) => Err(RcError::io(&link, e)),
    }
}

/// Clears every entry scheduled against `trigger`. `ENOENT` is success.
pub fn schedule_clear(ctx: &Context, trigger: &str) -> Result<bool> {
    let trigger_dir = scheduled_root(ctx).join(trigger);
    remove_tree(&trigger_dir, true)?;
    debug!(trigger, "schedule cleared");
    Ok(true)
}

/// Lists the dependents scheduled against `trigger`.
pub fn scheduled(ctx: &Context, trigger: &str) -> Result<Vec<String>> {
    list_dir(&scheduled_root(ctx).join(trigger), EntryFilter::InitScript)
}

/// For every trigger directory under `<state>/scheduled/`, returns the full
/// path of the entry named `dependent`, if present.
///
/// Returns full paths rather than bare names, unlike its siblings; this
/// asymmetry is preserved from the reference implementation (see
/// `SPEC_FULL.md` §9) rather than "fixed" here.
pub fn scheduled_by(ctx: &Context, dependent: &str) -> Result<Vec<PathBuf>> {
    let root = scheduled_root(ctx);
    let read_dir = match fs::read_dir(&root) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RcError::io(&root, e)),
    };

    let mut trigger_names: Vec<String> = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| RcError::io(&root, e))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            trigger_names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    trigger_names.sort();

    let mut out = Vec::new();
    for trigger in trigger_names {
        let candidate = root.join(&trigger).join(dependent);
        if fs::symlink_metadata(&candidate).is_ok() {
            out.push(candidate);
        }
    }
    Ok(out)
}
