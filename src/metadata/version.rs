//! Installer version derived from git-describe style package versions.

use crate::bundler::{Error, Result};
use regex::Regex;
use std::{fmt, str::FromStr, sync::LazyLock};

/// `1.2.3`, `v1.2.3`, `v1.2.3-45-gabcdef` (anything after the offset is ignored).
static DESCRIBE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-(\d+))?").unwrap_or_else(|e| {
        unreachable!("version pattern is a valid regex: {e}")
    })
});

/// Installer-friendly version: `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH.OFFSET`.
///
/// A git-describe string such as `v1.2.3-4-gabcdef` sorts before `v1.2.4` but
/// is not a valid Windows Installer version, so the commit offset since the
/// tag becomes the fourth component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Commits since the tag, if any.
    pub offset: Option<u64>,
}

impl NormalizedVersion {
    /// Parse a package version string.
    ///
    /// Fails with [`Error::VersionParse`] carrying the original string when it
    /// doesn't start with a `MAJOR.MINOR.PATCH` triple.
    pub fn parse(version: &str) -> Result<Self> {
        let invalid = || Error::VersionParse(version.to_string());
        let caps = DESCRIBE_VERSION.captures(version).ok_or_else(invalid)?;

        let component = |i: usize| -> Result<Option<u64>> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .transpose()
        };

        Ok(Self {
            major: component(1)?.ok_or_else(invalid)?,
            minor: component(2)?.ok_or_else(invalid)?,
            patch: component(3)?.ok_or_else(invalid)?,
            offset: component(4)?,
        })
    }
}

impl FromStr for NormalizedVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(offset) = self.offset {
            write!(f, ".{offset}")?;
        }
        Ok(())
    }
}
