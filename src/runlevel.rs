//! The runlevel registry: enumeration, the current-runlevel pointer, and
//! the transient starting/stopping markers.
use std::fs;

use tracing::debug;

use crate::context::Context;
use crate::error::{RcError, Result};
use crate::paths::{list_dir, EntryFilter};

/// The special pseudo-runlevel used when no `softlevel` has been recorded.
pub const SYSINIT: &str = "sysinit";
/// The pseudo-runlevel containing no services.
pub const SINGLE: &str = "single";
/// The runlevel that only accepts services living directly in `<init>`.
pub const BOOT: &str = "boot";

/// Lists the known runlevels (directories under `<runlevels>`).
pub fn runlevel_list(ctx: &Context) -> Result<Vec<String>> {
    list_dir(ctx.runlevels_dir(), EntryFilter::DirectoryOnly)
}

/// Reads the current runlevel from `<state>/softlevel`. Absence or an empty
/// first line is interpreted as [`SYSINIT`].
pub fn runlevel_get(ctx: &Context) -> Result<String> {
    let path = ctx.state_subdir("softlevel");
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let first_line = contents.lines().next().unwrap_or("").trim();
            if first_line.is_empty() {
                Ok(SYSINIT.to_string())
            } else {
                Ok(first_line.to_string())
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SYSINIT.to_string()),
        Err(e) => Err(RcError::io(&path, e)),
    }
}

/// Truncates and writes `<state>/softlevel` with `level`.
pub fn runlevel_set(ctx: &Context, level: &str) -> Result<()> {
    let path = ctx.state_subdir("softlevel");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RcError::io(parent, e))?;
    }
    fs::write(&path, level).map_err(|e| RcError::io(&path, e))?;
    debug!(level, "runlevel set");
    Ok(())
}

/// Tests for the transient `<state>/rc.starting` presence marker.
pub fn runlevel_starting(ctx: &Context) -> bool {
    ctx.state_subdir("rc.starting").exists()
}

/// Tests for the transient `<state>/rc.stopping` presence marker.
pub fn runlevel_stopping(ctx: &Context) -> bool {
    ctx.state_subdir("rc.stopping").exists()
}

/// Tests whether `level` names an existing runlevel directory.
pub fn runlevel_exists(ctx: &Context, level: &str) -> bool {
    ctx.runlevels_dir().join(level).is_dir()
}
