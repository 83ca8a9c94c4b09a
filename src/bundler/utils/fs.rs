//! File system utilities for packaging.
//!
//! Provides file operations with automatic directory creation and
//! path-carrying error context.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates `path`, treating an existing directory as success.
pub async fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e).fs_context("creating directory", path),
    }
}

/// Writes `contents` to `path`, creating any parent directories as needed.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating parent directory", parent)?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing file", path)
}

/// Writes the same contents to every path in `paths`.
///
/// All copies are written from one buffer so they stay byte-identical.
pub async fn write_copies(paths: &[&Path], contents: &[u8]) -> Result<()> {
    for path in paths {
        write_file(path, contents).await?;
    }
    Ok(())
}
