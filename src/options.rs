//! The per-service options store: `<state>/options/<service>/<key>`.
use std::fs;

use tracing::debug;

use crate::context::Context;
use crate::error::{RcError, Result};

fn options_dir(ctx: &Context, service: &str) -> std::path::PathBuf {
    ctx.state_subdir("options").join(service)
}

/// Reads the first line of `<state>/options/<service>/<key>`, if present.
pub fn value_get(ctx: &Context, service: &str, key: &str) -> Result<Option<String>> {
    let path = options_dir(ctx, service).join(key);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(Some(contents.lines().next().unwrap_or("").to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RcError::io(&path, e)),
    }
}

/// Writes `value` (which may be empty) to `<state>/options/<service>/<key>`,
/// creating the per-service directory if needed.
pub fn value_set(ctx: &Context, service: &str, key: &str, value: &str) -> Result<()> {
    let dir = options_dir(ctx, service);
    fs::create_dir_all(&dir).map_err(|e| RcError::io(&dir, e))?;
    let path = dir.join(key);
    fs::write(&path, value).map_err(|e| RcError::io(&path, e))?;
    debug!(service, key, "option value set");
    Ok(())
}
