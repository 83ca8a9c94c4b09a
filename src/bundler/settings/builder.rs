//! Builder for constructing Settings.

use super::{Arch, Settings, WixSettings};
use crate::{bail, bundler::Result};
use crate::source::Extractor;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Unset paths are derived from the project root using the electron-builder
/// project layout:
///
/// | Setting | Default |
/// |---------|---------|
/// | dist dir | `<root>/dist` |
/// | output dir | dist dir |
/// | template | `<root>/build/wix/main.wxs` |
/// | definitions | `<root>/build/wix/dialogs.wxs` |
/// | WiX toolset | `<root>/resources/host/wix` |
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_msi::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_msi::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .wix_dir("C:/tools/wix311")
///     .jobs(2)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    dist_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    template: Option<PathBuf>,
    definitions: Option<Vec<PathBuf>>,
    wix_dir: Option<PathBuf>,
    arch: Arch,
    extensions: Option<Vec<String>>,
    suppressed_ices: Option<Vec<String>>,
    cab_cache: Option<PathBuf>,
    display_name: Option<String>,
    development: bool,
    extractor: Extractor,
    temp_root: Option<PathBuf>,
    jobs: Option<usize>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root all default paths derive from.
    ///
    /// Default: current directory
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory scanned for the `*-win.zip` archive.
    pub fn dist_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory receiving the MSI.
    ///
    /// Default: the dist dir
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the installer definition template.
    pub fn template<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the static definition files compiled next to the rendered one.
    pub fn definitions(mut self, paths: Vec<PathBuf>) -> Self {
        self.definitions = Some(paths);
        self
    }

    /// Sets the directory containing `candle.exe` and `light.exe`.
    pub fn wix_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.wix_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target architecture.
    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = arch;
        self
    }

    /// Sets the `light.exe -ext` extensions.
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Sets the ICE validations to suppress.
    pub fn suppressed_ices(mut self, ices: Vec<String>) -> Self {
        self.suppressed_ices = Some(ices);
        self
    }

    /// Sets the cabinet cache directory.
    pub fn cab_cache<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cab_cache = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the display name used in the MSI file name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Selects fast compression.
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Sets how the archive is unpacked.
    ///
    /// Default: external `unzip`
    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Sets the parent directory of the temporary work directory.
    pub fn temp_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the maximum number of concurrent compiler processes.
    ///
    /// Default: number of CPUs
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory can't be determined, a path
    /// can't be absolutized, or `jobs` is zero.
    pub fn build(self) -> Result<Settings> {
        let root = match self.project_root {
            Some(root) => absolute(&root)?,
            None => std::env::current_dir()?,
        };
        let resolve = |path: Option<PathBuf>, default: &[&str]| -> Result<PathBuf> {
            match path {
                Some(path) => absolute(&path),
                None => Ok(default.iter().fold(root.clone(), |p, part| p.join(part))),
            }
        };

        let dist_dir = resolve(self.dist_dir, &["dist"])?;
        let output_dir = match self.output_dir {
            Some(dir) => absolute(&dir)?,
            None => dist_dir.clone(),
        };
        let template = resolve(self.template, &["build", "wix", "main.wxs"])?;
        let wix_dir = resolve(self.wix_dir, &["resources", "host", "wix"])?;
        let definitions = match self.definitions {
            Some(paths) => paths.iter().map(|p| absolute(p)).collect::<Result<Vec<_>>>()?,
            None => vec![root.join("build").join("wix").join("dialogs.wxs")],
        };

        let mut wix = WixSettings::new(wix_dir, template);
        wix.definitions = definitions;
        wix.arch = self.arch;
        if let Some(extensions) = self.extensions {
            wix.extensions = extensions;
        }
        if let Some(ices) = self.suppressed_ices {
            wix.suppressed_ices = ices;
        }
        wix.cab_cache = self.cab_cache.map(|p| absolute(&p)).transpose()?;

        let jobs = self.jobs.unwrap_or_else(num_cpus::get);
        if jobs == 0 {
            bail!("jobs must be at least 1");
        }

        let temp_root = self.temp_root.map(|p| absolute(&p)).transpose()?;

        Ok(Settings::new(
            dist_dir,
            output_dir,
            wix,
            self.display_name,
            self.development,
            self.extractor,
            temp_root,
            jobs,
        ))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
