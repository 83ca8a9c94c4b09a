//! Scoped temporary working directory.
//!
//! The directory is removed by [`WorkDir::close`] on the normal path and by
//! `Drop` on every other exit (early `?` return, panic unwinding).

use crate::bundler::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Subdirectory holding the extracted application.
pub const APP_DIR: &str = "appDir";

/// Temporary directory owned for the duration of one packaging run.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh directory named `<prefix><random>` under `parent`
    /// (the system temp dir when `None`).
    pub fn create(parent: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .fs_context("creating work directory in", parent)?,
            None => builder
                .tempdir()
                .fs_context("creating work directory in", std::env::temp_dir())?,
        };
        log::debug!("Created work directory {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Root of the work directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the application archive is unpacked.
    pub fn app_dir(&self) -> PathBuf {
        self.path().join(APP_DIR)
    }

    /// Remove the directory tree, reporting failures.
    pub async fn close(self) -> Result<()> {
        let path = self.path().to_path_buf();
        tokio::task::spawn_blocking(move || self.dir.close())
            .await
            .map_err(Error::from)?
            .fs_context("removing work directory", &path)?;
        log::debug!("Removed work directory {}", path.display());
        Ok(())
    }
}
