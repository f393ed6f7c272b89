//! Fixture helpers shared by the integration test binaries.
//!
//! Deliberately separate from `rc_core`'s own internal `test_support`
//! module: integration tests link this crate as an ordinary external
//! dependency and so can only reach its public API.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::PathBuf;

use rc_core::Context;
use tempfile::TempDir;

pub struct Fixture {
    _root: TempDir,
    ctx: Context,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let state_dir = root.path().join("state");
        let init_dir = root.path().join("init");
        let init_local_dir = root.path().join("init_local");
        let runlevels_dir = root.path().join("runlevels");
        for dir in [&state_dir, &init_dir, &init_local_dir, &runlevels_dir] {
            fs::create_dir_all(dir).expect("create fixture dir");
        }
        let ctx = Context::new(state_dir, init_dir, init_local_dir, runlevels_dir);
        Self { _root: root, ctx }
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    fn write_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).expect("write fixture script");
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    pub fn add_init_script(&self, name: &str) -> PathBuf {
        Self::write_script(self.ctx.init_dir(), name, "#!/bin/sh\nexit 0\n")
    }

    pub fn add_init_local_script(&self, name: &str) -> PathBuf {
        Self::write_script(self.ctx.init_local_dir(), name, "#!/bin/sh\nexit 0\n")
    }

    pub fn link_state_marker(&self, state_name: &str, service: &str, target: &str) -> PathBuf {
        let dir = self.ctx.state_dir().join(state_name);
        fs::create_dir_all(&dir).expect("create state marker dir");
        let link = dir.join(service);
        let _ = fs::remove_file(&link);
        symlink(target, &link).expect("create state marker symlink");
        PathBuf::from(target)
    }

    pub fn has_state_marker(&self, state_name: &str, service: &str) -> bool {
        self.ctx
            .state_dir()
            .join(state_name)
            .join(service)
            .symlink_metadata()
            .is_ok()
    }

    pub fn add_runlevel(&self, level: &str) -> PathBuf {
        let dir = self.ctx.runlevels_dir().join(level);
        fs::create_dir_all(&dir).expect("create runlevel dir");
        dir
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
