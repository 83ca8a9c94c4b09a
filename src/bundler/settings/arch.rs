//! CPU architecture types and utilities.

use std::{fmt, str::FromStr};

/// Target architecture of the packaged application.
///
/// Passed to the WiX compiler as `-arch`, which controls the
/// `ProgramFiles` folder and the package platform.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    #[default]
    X86_64,
    /// x86 / i686 (32-bit)
    X86,
    /// AArch64 / ARM64 (64-bit)
    AArch64,
}

impl Arch {
    /// The value `candle.exe -arch` expects.
    pub fn wix_name(self) -> &'static str {
        match self {
            Arch::X86_64 => "x64",
            Arch::X86 => "x86",
            Arch::AArch64 => "arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X86_64),
            "x86" | "i686" | "ia32" => Ok(Arch::X86),
            "arm64" | "aarch64" => Ok(Arch::AArch64),
            other => Err(format!(
                "Unsupported architecture for MSI: {other}. Valid: x64, x86, arm64"
            )),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wix_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("amd64".parse::<Arch>(), Ok(Arch::X86_64));
        assert_eq!("AArch64".parse::<Arch>(), Ok(Arch::AArch64));
        assert!("riscv64".parse::<Arch>().is_err());
    }

    #[test]
    fn test_wix_names() {
        assert_eq!(Arch::default().wix_name(), "x64");
        assert_eq!(Arch::X86.to_string(), "x86");
    }
}
