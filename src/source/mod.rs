//! Distribution archive discovery and extraction.

use crate::bundler::{Error, Result, error::ErrorExt, utils::process};
use std::{
    ffi::OsStr,
    fs,
    io,
    path::{Component, Path, PathBuf},
};

/// Suffix of the zipped Windows build produced by electron-builder.
pub const WINDOWS_ARCHIVE_SUFFIX: &str = "-win.zip";

/// How the distribution archive gets unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// External `unzip`-compatible tool, invoked as `<tool> -d <dest> <archive>`.
    External(PathBuf),
    /// In-process extraction with the `zip` crate.
    Builtin,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::External(PathBuf::from("unzip"))
    }
}

/// Find the first entry of `dist_dir` (in name order) ending in [`WINDOWS_ARCHIVE_SUFFIX`].
pub async fn locate_archive(dist_dir: &Path) -> Result<PathBuf> {
    let mut entries = tokio::fs::read_dir(dist_dir)
        .await
        .fs_context("listing distribution directory", dist_dir)?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("listing distribution directory", dist_dir)?
    {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(WINDOWS_ARCHIVE_SUFFIX) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    if names.len() > 1 {
        log::warn!(
            "found {} *{} archives in {}, using {}",
            names.len(),
            WINDOWS_ARCHIVE_SUFFIX,
            dist_dir.display(),
            names[0]
        );
    }

    names
        .into_iter()
        .next()
        .map(|name| dist_dir.join(name))
        .ok_or_else(|| Error::ArchiveNotFound {
            dir: dist_dir.to_path_buf(),
            suffix: WINDOWS_ARCHIVE_SUFFIX,
        })
}

impl Extractor {
    /// Unpack `archive` into the existing directory `dest`.
    pub async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        log::info!("Extracting {} to {}", archive.display(), dest.display());
        match self {
            Extractor::External(tool) => {
                process::run(tool, [OsStr::new("-d"), dest.as_os_str(), archive.as_os_str()])
                    .await
            }
            Extractor::Builtin => {
                let archive = archive.to_path_buf();
                let dest = dest.to_path_buf();
                tokio::task::spawn_blocking(move || extract_zip(&archive, &dest)).await?
            }
        }
    }
}

/// Extract a ZIP archive, rejecting entries that would land outside `dest`.
fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive).fs_context("opening distribution archive", archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .filter(|p| p.components().all(|c| matches!(c, Component::Normal(_))))
            .ok_or_else(|| {
                Error::GenericError(format!(
                    "Invalid ZIP entry path (potential traversal attack): {}",
                    entry.name()
                ))
            })?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).fs_context("creating directory", &out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }
        let mut out = fs::File::create(&out_path).fs_context("creating file", &out_path)?;
        io::copy(&mut entry, &mut out).fs_context("writing extracted file", &out_path)?;
    }

    Ok(())
}
