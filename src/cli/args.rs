//! Command line argument parsing and validation.
//!
//! Every option can also be set through a `KODEGEN_MSI_*` environment
//! variable; the command line wins when both are present.

use crate::{
    bundler::{self, Arch, Settings, SettingsBuilder},
    source::Extractor,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the distribution archive is unpacked
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractorKind {
    /// Run an external `unzip` binary
    #[default]
    Unzip,
    /// Extract in-process
    Builtin,
}

/// Windows MSI packager for Electron builds
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_msi",
    version,
    about = "Build a Windows MSI installer from an electron-builder zip",
    long_about = "Builds a Windows MSI installer from the *-win.zip produced by electron-builder.

Unpacks the archive into a temporary directory, writes resources/app-update.yml for
the auto-updater, renders build/wix/main.wxs over the file tree and runs the WiX 3
toolset (candle.exe, light.exe) to produce \"<Name> Setup <version>.msi\".

Usage:
  kodegen_bundler_msi
  kodegen_bundler_msi --project-root ../app --development
  kodegen_bundler_msi --wix-dir C:\\tools\\wix311 --jobs 2

Exit code 0 = installer exists in the output directory."
)]
pub struct Args {
    /// Project root all default paths derive from
    #[arg(long, env = "KODEGEN_MSI_PROJECT_ROOT", value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Directory scanned for the *-win.zip archive [default: <root>/dist]
    #[arg(long, env = "KODEGEN_MSI_DIST_DIR", value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Directory receiving the MSI [default: the dist dir]
    #[arg(short = 'o', long, env = "KODEGEN_MSI_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Installer definition template [default: <root>/build/wix/main.wxs]
    #[arg(long, env = "KODEGEN_MSI_TEMPLATE", value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Static definition file compiled next to the rendered one, repeatable;
    /// the environment variable takes a comma-separated list
    /// [default: <root>/build/wix/dialogs.wxs]
    #[arg(
        long = "definition",
        env = "KODEGEN_MSI_DEFINITIONS",
        value_name = "FILE",
        value_delimiter = ','
    )]
    pub definitions: Vec<PathBuf>,

    /// Directory containing candle.exe and light.exe [default: <root>/resources/host/wix]
    #[arg(long, env = "KODEGEN_MSI_WIX_DIR", value_name = "DIR")]
    pub wix_dir: Option<PathBuf>,

    /// Target architecture: x64, x86, arm64
    #[arg(long, env = "KODEGEN_MSI_ARCH", default_value = "x64")]
    pub arch: Arch,

    /// Display name used in the MSI file name [default: productName from package.json]
    #[arg(long, env = "KODEGEN_MSI_DISPLAY_NAME", value_name = "NAME")]
    pub display_name: Option<String>,

    /// Fast (mszip) compression for local builds
    #[arg(long, env = "KODEGEN_MSI_DEVELOPMENT")]
    pub development: bool,

    /// How the archive is unpacked
    #[arg(long, env = "KODEGEN_MSI_EXTRACTOR", value_enum, default_value_t = ExtractorKind::Unzip)]
    pub extractor: ExtractorKind,

    /// unzip binary used by the unzip extractor
    #[arg(long, env = "KODEGEN_MSI_UNZIP", value_name = "PATH", default_value = "unzip")]
    pub unzip: PathBuf,

    /// Parent directory of the temporary work directory [default: system temp]
    #[arg(long, env = "KODEGEN_MSI_TEMP_ROOT", value_name = "DIR")]
    pub temp_root: Option<PathBuf>,

    /// Maximum concurrent candle.exe processes [default: number of CPUs]
    #[arg(short, long, env = "KODEGEN_MSI_JOBS")]
    pub jobs: Option<usize>,

    /// Suppress the header and summary
    #[arg(short, long, env = "KODEGEN_MSI_QUIET")]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == Some(0) {
            return Err("--jobs must be at least 1".to_string());
        }
        if self
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err("--display-name cannot be empty".to_string());
        }
        Ok(())
    }

    /// Selected extractor
    pub fn extractor(&self) -> Extractor {
        match self.extractor {
            ExtractorKind::Unzip => Extractor::External(self.unzip.clone()),
            ExtractorKind::Builtin => Extractor::Builtin,
        }
    }

    /// Packaging settings for these arguments
    pub fn settings(&self) -> bundler::Result<Settings> {
        let mut builder = SettingsBuilder::new()
            .arch(self.arch)
            .development(self.development)
            .extractor(self.extractor());

        if let Some(root) = &self.project_root {
            builder = builder.project_root(root);
        }
        if let Some(dir) = &self.dist_dir {
            builder = builder.dist_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(template) = &self.template {
            builder = builder.template(template);
        }
        if !self.definitions.is_empty() {
            builder = builder.definitions(self.definitions.clone());
        }
        if let Some(dir) = &self.wix_dir {
            builder = builder.wix_dir(dir);
        }
        if let Some(name) = &self.display_name {
            builder = builder.display_name(name.clone());
        }
        if let Some(dir) = &self.temp_root {
            builder = builder.temp_root(dir);
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("kodegen_bundler_msi").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[cfg(unix)]
    #[test]
    fn test_settings_from_args() {
        let args = parse(&[
            "--project-root",
            "/src/app",
            "--definition",
            "/src/app/a.wxs",
            "--definition",
            "/src/app/b.wxs",
            "--extractor",
            "builtin",
            "--development",
            "--jobs",
            "2",
        ]);
        let settings = args.settings().unwrap();

        assert_eq!(settings.dist_dir(), std::path::Path::new("/src/app/dist"));
        assert_eq!(settings.wix().definitions.len(), 2);
        assert_eq!(settings.extractor(), &Extractor::Builtin);
        assert!(settings.development());
        assert_eq!(settings.jobs(), 2);
    }

    #[test]
    fn test_unzip_path() {
        let args = parse(&["--unzip", "/opt/bin/unzip"]);
        assert_eq!(args.extractor(), Extractor::External("/opt/bin/unzip".into()));
    }

    #[test]
    fn test_validate() {
        assert!(parse(&["--jobs", "0"]).validate().is_err());
        assert!(parse(&["--display-name", " "]).validate().is_err());
        assert!(parse(&[]).validate().is_ok());
    }

    #[test]
    fn test_every_option_has_env_fallback() {
        use clap::CommandFactory;
        let command = Args::command();
        for arg in command.get_arguments() {
            if matches!(arg.get_id().as_str(), "help" | "version") {
                continue;
            }
            let env = arg
                .get_env()
                .unwrap_or_else(|| panic!("--{} has no environment variable", arg.get_id()));
            assert!(env.to_string_lossy().starts_with("KODEGEN_MSI_"));
        }
    }

    #[test]
    fn test_definitions_split_on_comma() {
        let args = parse(&["--definition", "a.wxs,b.wxs", "--definition", "c.wxs"]);
        assert_eq!(
            args.definitions,
            [PathBuf::from("a.wxs"), PathBuf::from("b.wxs"), PathBuf::from("c.wxs")]
        );
    }

    #[test]
    fn test_bad_arch_rejected() {
        assert!(Args::try_parse_from(["kodegen_bundler_msi", "--arch", "sparc"]).is_err());
    }
}
