//! Main packaging orchestration.

use super::{checksum::calculate_sha256, tool_detection};
use crate::{
    bundler::{
        BundledArtifact, Result, Settings,
        error::{Context, ErrorExt},
        platform::windows::msi,
        utils::{fs, workdir::WorkDir},
    },
    source, update,
};
use std::path::{Path, PathBuf};

/// Name prefix of the temporary work directory.
pub const WORK_DIR_PREFIX: &str = "msi-wix-";

/// Packaging run driver.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_msi::bundler::Result<()> {
/// let artifact = Bundler::new(settings).bundle().await?;
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs the whole pipeline and returns the installer.
    ///
    /// Nothing is written until the archive has been found and the toolset
    /// checked. Once the work directory exists it is removed before this
    /// returns, on success and on failure. If the future is dropped midway
    /// the directory is removed by its `Drop`.
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        let archive = source::locate_archive(self.settings.dist_dir()).await?;
        log::info!("Packaging {}", archive.display());
        tool_detection::preflight(&self.settings).await?;

        let work_dir = WorkDir::create(self.settings.temp_root(), WORK_DIR_PREFIX)?;
        let outcome = self.package(&archive, &work_dir).await;
        let cleanup = work_dir.close().await;

        let installer = match (outcome, cleanup) {
            (Ok(installer), Ok(())) => installer,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(cleanup)) => {
                log::warn!("{cleanup}");
                return Err(e);
            }
        };

        let metadata = tokio::fs::metadata(&installer)
            .await
            .fs_context("reading artifact metadata", &installer)?;
        let checksum = calculate_sha256(&installer).await?;

        Ok(BundledArtifact {
            path: installer,
            size: metadata.len(),
            checksum,
        })
    }

    async fn package(&self, archive: &Path, work_dir: &WorkDir) -> Result<PathBuf> {
        let app_dir = work_dir.app_dir();
        fs::create_dir(&app_dir).await?;

        self.settings
            .extractor()
            .extract(archive, &app_dir)
            .await
            .with_context(|| format!("extracting {}", archive.display()))?;

        update::write_update_config(&app_dir).await?;

        msi::build_installer(&self.settings, work_dir).await
    }
}
