//! Core Settings struct and implementations.

use super::{MsiCompression, WixSettings};
use crate::source::Extractor;
use std::path::{Path, PathBuf};

/// Main settings for a packaging run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Every path is
/// absolute because the WiX tools receive them on the command line.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_msi::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root("/src/app")
///     .development(true)
///     .build()?;
/// assert!(settings.dist_dir().ends_with("dist"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory scanned for the `*-win.zip` archive.
    dist_dir: PathBuf,

    /// Where the MSI, the kept `project.wxs` copy and the cab cache go.
    output_dir: PathBuf,

    /// WiX toolset configuration.
    wix: WixSettings,

    /// Overrides the display name read from package metadata.
    display_name: Option<String>,

    /// Fast compression for local builds.
    development: bool,

    /// How the distribution archive is unpacked.
    extractor: Extractor,

    /// Parent of the temporary work directory (system temp when None).
    temp_root: Option<PathBuf>,

    /// Maximum concurrent `candle.exe` processes.
    jobs: usize,
}

impl Settings {
    /// Returns the distribution directory.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the WiX settings.
    pub fn wix(&self) -> &WixSettings {
        &self.wix
    }

    /// Returns the display name override.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Whether this is a development build.
    pub fn development(&self) -> bool {
        self.development
    }

    /// Cabinet compression for this build.
    pub fn compression(&self) -> MsiCompression {
        MsiCompression::for_build(self.development)
    }

    /// Returns the archive extractor.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Returns the work directory parent.
    pub fn temp_root(&self) -> Option<&Path> {
        self.temp_root.as_deref()
    }

    /// Returns the compile concurrency bound.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Cabinet cache directory (`<output_dir>/wix-cache` unless configured).
    pub fn cab_cache(&self) -> PathBuf {
        self.wix
            .cab_cache
            .clone()
            .unwrap_or_else(|| self.output_dir.join("wix-cache"))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        dist_dir: PathBuf,
        output_dir: PathBuf,
        wix: WixSettings,
        display_name: Option<String>,
        development: bool,
        extractor: Extractor,
        temp_root: Option<PathBuf>,
        jobs: usize,
    ) -> Self {
        Self {
            dist_dir,
            output_dir,
            wix,
            display_name,
            development,
            extractor,
            temp_root,
            jobs,
        }
    }
}
