//! Package metadata embedded in an unpacked Electron application.
//!
//! `package.json` lives inside `resources/app.asar`; it is read straight out
//! of the archive rather than extracting the archive to disk.

pub mod asar;
mod version;

pub use version::NormalizedVersion;

use crate::bundler::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Resource archive path relative to the application directory.
pub const RESOURCE_ARCHIVE: &str = "resources/app.asar";

/// Metadata entry inside the resource archive.
pub const PACKAGE_JSON: &str = "package.json";

/// Fields of `package.json` the packager cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// npm package name; also used as the updater cache directory name.
    pub name: String,

    /// Human-readable product name, if the package declares one.
    pub product_name: Option<String>,

    /// Raw version string, usually `git describe` output.
    pub version: String,

    /// Source repository URL.
    pub repository_url: Option<String>,
}

impl PackageMetadata {
    /// Parse `package.json` contents.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: RawPackageJson = serde_json::from_slice(bytes)?;
        Ok(Self {
            name: raw.name,
            product_name: raw.product_name,
            version: raw.version,
            repository_url: raw.repository.map(Repository::into_url),
        })
    }

    /// The normalized installer version.
    pub fn app_version(&self) -> Result<NormalizedVersion> {
        NormalizedVersion::parse(&self.version)
    }

    /// Name shown to users: `productName` when present, else `name`.
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPackageJson {
    name: String,
    #[serde(default)]
    product_name: Option<String>,
    version: String,
    #[serde(default)]
    repository: Option<Repository>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repository {
    Url(String),
    Object { url: String },
}

impl Repository {
    fn into_url(self) -> String {
        match self {
            Repository::Url(url) | Repository::Object { url } => url,
        }
    }
}

/// Path of the resource archive for an application directory.
pub fn resource_archive(app_dir: &Path) -> PathBuf {
    app_dir.join(RESOURCE_ARCHIVE)
}

/// Read the package metadata embedded in the application's resource archive.
pub async fn get_package_metadata(app_dir: &Path) -> Result<PackageMetadata> {
    let archive = resource_archive(app_dir);
    let bytes = asar::extract_file(&archive, PACKAGE_JSON)
        .await
        .with_context(|| format!("reading {PACKAGE_JSON} from {}", archive.display()))?;
    PackageMetadata::from_json(&bytes).context("parsing embedded package.json")
}

/// Read and normalize the application version.
pub async fn get_app_version(app_dir: &Path) -> Result<NormalizedVersion> {
    get_package_metadata(app_dir).await?.app_version()
}
