//! Path joining, directory listing, and recursive removal.
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{RcError, Result};

/// Filters applied by [`list_dir`] to directory entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    /// Entry looks like an init script: stat-able and not named `*.sh`.
    InitScript,
    /// Entry is itself a directory.
    DirectoryOnly,
}

fn passes_filter(entry: &fs::DirEntry, filter: EntryFilter) -> bool {
    let name = entry.file_name();
    let name = name.to_string_lossy();
    if name.starts_with('.') {
        return false;
    }

    match filter {
        EntryFilter::InitScript => {
            // Follow the symlink (entry.metadata() is an lstat and would
            // accept a marker whose target has been removed): a dangling
            // link must not be listed as a live service.
            if fs::metadata(entry.path()).is_err() {
                return false;
            }
            !name.ends_with(".sh")
        }
        EntryFilter::DirectoryOnly => entry.metadata().map(|m| m.is_dir()).unwrap_or(false),
    }
}

/// Lists the entries of `path`, applying `filter`, and returns their bare
/// file names in stable, lexicographic, case-sensitive order.
///
/// A missing `path` yields an empty sequence rather than an error, matching
/// the "treat absence as emptiness" convention used throughout the registry
/// components.
pub fn list_dir(path: &Path, filter: EntryFilter) -> Result<Vec<String>> {
    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RcError::io(path, e)),
    };

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| RcError::io(path, e))?;
        if passes_filter(&entry, filter) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Returns `true` iff some execute bit (owner, group, or other) is set on
/// `path`'s metadata.
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Recursively removes the contents of `path`. If `remove_root`, the
/// directory itself is removed too. Symlinks are treated as plain files
/// (never followed). A missing `path` is treated as an already-satisfied
/// removal.
///
/// Fails on the first underlying I/O error; partial removal is possible and
/// observable, matching the reference's "no rollback" contract.
pub fn remove_tree(path: &Path, remove_root: bool) -> Result<()> {
    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(RcError::io(path, e)),
    };

    for entry in read_dir {
        let entry = entry.map_err(|e| RcError::io(path, e))?;
        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(|e| RcError::io(&entry_path, e))?;
        if file_type.is_dir() {
            remove_tree(&entry_path, true)?;
        } else {
            fs::remove_file(&entry_path).map_err(|e| RcError::io(&entry_path, e))?;
        }
    }

    if remove_root {
        match fs::remove_dir(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(RcError::io(path, e)),
        }
    }

    debug!(path = %path.display(), remove_root, "removed tree");
    Ok(())
}

/// Best-effort `rmdir`: succeeds silently on `ENOENT`, and logs (rather than
/// propagates) any other failure such as `ENOTEMPTY` from a concurrent
/// writer, matching the reference's errno-preserving "ignore rmdir errors"
/// cleanup convention.
pub fn rmdir_best_effort(path: &Path) {
    match fs::remove_dir(path) {
        Ok(()) => debug!(path = %path.display(), "pruned empty directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "best-effort rmdir failed"),
    }
}

/// Joins path fragments the way the reference `rc_strcatpaths`-style helper
/// does: a thin wrapper over [`Path::join`] kept as a named function so
/// call sites read the same as the original component list.
pub fn join(base: &Path, fragment: &str) -> PathBuf {
    base.join(fragment)
}
