//! Resolution of a bare service name to its on-disk init script.
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::{RcError, Result};

/// Returns the basename of a service argument that may be a bare name or an
/// absolute path.
pub fn basename(service: &str) -> &str {
    Path::new(service)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(service)
}

fn read_symlink_target(path: &Path) -> Option<PathBuf> {
    fs::symlink_metadata(path).ok()?;
    fs::read_link(path).ok()
}

/// Resolves `service` to the canonical path of its init script.
///
/// `service` may be an absolute path, in which case it is returned
/// unchanged without touching the filesystem. Otherwise resolution walks,
/// in order: the `started` state marker, the `inactive` state marker, the
/// primary init directory, then the local init directory.
pub fn service_resolve(ctx: &Context, service: &str) -> Result<PathBuf> {
    let path = Path::new(service);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    if let Some(target) = read_symlink_target(&ctx.state_subdir("started").join(service)) {
        return Ok(target);
    }
    if let Some(target) = read_symlink_target(&ctx.state_subdir("inactive").join(service)) {
        return Ok(target);
    }

    let primary = ctx.init_dir().join(service);
    if primary.exists() {
        return Ok(primary);
    }

    let local = ctx.init_local_dir().join(service);
    if local.exists() {
        return Ok(local);
    }

    Err(RcError::not_found(format!("service '{service}'")))
}

/// A service exists iff it resolves, the resolved target is executable by
/// some permission class, and the name does not end in `.sh`.
pub fn service_exists(ctx: &Context, service: &str) -> bool {
    if service.ends_with(".sh") {
        return false;
    }
    match service_resolve(ctx, service) {
        Ok(path) => crate::paths::is_executable(&path),
        Err(_) => false,
    }
}
