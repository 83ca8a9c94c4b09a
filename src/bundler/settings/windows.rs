//! Windows Installer (WiX 3) settings.

use super::Arch;
use std::path::PathBuf;

/// Cabinet compression level written into the definition template.
///
/// # Comparison
///
/// | Level | Speed | Size | Notes |
/// |-------|-------|------|-------|
/// | MsZip | Fast | Larger | Development builds |
/// | High | Slow | Smallest | Release builds |
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MsiCompression {
    /// `mszip` - fast, used for local iteration.
    MsZip,
    /// `high` - best ratio.
    #[default]
    High,
}

impl MsiCompression {
    /// Compression for a development or release build.
    pub fn for_build(development: bool) -> Self {
        if development {
            MsiCompression::MsZip
        } else {
            MsiCompression::High
        }
    }

    /// Value of the WiX `CompressionLevel` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            MsiCompression::MsZip => "mszip",
            MsiCompression::High => "high",
        }
    }
}

/// WiX toolset configuration.
///
/// # See Also
///
/// - [`MsiCompression`] - Cabinet compression levels
#[derive(Clone, Debug)]
pub struct WixSettings {
    /// Directory containing `candle.exe` and `light.exe`.
    pub toolset_dir: PathBuf,

    /// Mustache/handlebars template rendered into `project.wxs`.
    pub template: PathBuf,

    /// Static definition files compiled alongside the rendered one.
    ///
    /// Default: `build/wix/dialogs.wxs`
    pub definitions: Vec<PathBuf>,

    /// Target architecture for `candle.exe -arch`.
    ///
    /// Default: [`Arch::X86_64`]
    pub arch: Arch,

    /// Extensions passed to `light.exe -ext`.
    ///
    /// Default: `["WixUIExtension"]`
    pub extensions: Vec<String>,

    /// ICE validations skipped with `light.exe -sice:`.
    ///
    /// ICE60 flags versioned files without a language (icon fonts trip it);
    /// ICE61 conflicts with `AllowSameVersionUpgrades`.
    ///
    /// Default: `["ICE60", "ICE61"]`
    pub suppressed_ices: Vec<String>,

    /// Cabinet cache reused across runs (`light.exe -cc ... -reusecab`).
    ///
    /// Default: `<output_dir>/wix-cache`
    pub cab_cache: Option<PathBuf>,
}

impl WixSettings {
    /// Executable name of the WiX compiler.
    pub const COMPILER: &'static str = "candle.exe";

    /// Executable name of the WiX linker.
    pub const LINKER: &'static str = "light.exe";

    /// Settings rooted at the toolset and template paths, with defaults elsewhere.
    pub fn new(toolset_dir: impl Into<PathBuf>, template: impl Into<PathBuf>) -> Self {
        Self {
            toolset_dir: toolset_dir.into(),
            template: template.into(),
            definitions: Vec::new(),
            arch: Arch::default(),
            extensions: vec!["WixUIExtension".to_string()],
            suppressed_ices: vec!["ICE60".to_string(), "ICE61".to_string()],
            cab_cache: None,
        }
    }

    /// Full path of `candle.exe`.
    pub fn compiler(&self) -> PathBuf {
        self.toolset_dir.join(Self::COMPILER)
    }

    /// Full path of `light.exe`.
    pub fn linker(&self) -> PathBuf {
        self.toolset_dir.join(Self::LINKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_branch() {
        assert_eq!(MsiCompression::for_build(true).as_str(), "mszip");
        assert_eq!(MsiCompression::for_build(false).as_str(), "high");
    }

    #[test]
    fn test_tool_paths() {
        let wix = WixSettings::new("/opt/wix", "/src/main.wxs");
        assert_eq!(wix.compiler(), PathBuf::from("/opt/wix/candle.exe"));
        assert_eq!(wix.linker(), PathBuf::from("/opt/wix/light.exe"));
        assert_eq!(wix.suppressed_ices, ["ICE60", "ICE61"]);
    }
}
