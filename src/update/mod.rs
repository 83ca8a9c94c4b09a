//! `app-update.yml` generation.
//!
//! electron-builder only writes the auto-update descriptor when it builds the
//! NSIS installer itself, so the MSI path has to produce it: owner and repo
//! come from the embedded package's repository URL, the cache directory from
//! the package name, and everything under `publish` in `electron-builder.yml`
//! is merged on top.

use crate::bundler::{Error, Result, error::ErrorExt};
use crate::metadata::{self, PackageMetadata};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Build configuration file in the unpacked application tree.
pub const BUILD_CONFIG: &str = "electron-builder.yml";

/// Descriptor location relative to the application directory.
pub const UPDATE_DESCRIPTOR: &str = "resources/app-update.yml";

/// The only hosting service the updater knows how to query.
pub const RECOGNIZED_HOST: &str = "github.com";

/// Keys computed by the writer; a `publish` entry with the same name wins.
const RESERVED_KEYS: [&str; 3] = ["owner", "repo", "updaterCacheDirName"];

/// Owner and repository parsed from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// Account or organization.
    pub owner: String,
    /// Repository name without `.git`.
    pub repo: String,
}

impl RepositoryRef {
    /// Parse a repository URL hosted on [`RECOGNIZED_HOST`].
    ///
    /// A trailing `.git` is ignored. Any other host is rejected with
    /// [`Error::UnexpectedHost`].
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.strip_suffix(".git").unwrap_or(url);
        let parsed = url::Url::parse(trimmed)?;

        if parsed.host_str() != Some(RECOGNIZED_HOST) {
            return Err(Error::UnexpectedHost {
                url: parsed.to_string(),
            });
        }

        let mut segments = parsed
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(owner), Some(repo)) => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(Error::InvalidRepository(format!(
                "{trimmed} does not name an owner and repository"
            ))),
        }
    }
}

/// Build the descriptor mapping.
///
/// Computed keys are written first and `publish` settings are merged after
/// them, so configured values take precedence.
pub fn build_descriptor(metadata: &PackageMetadata, build_config: &Value) -> Result<Mapping> {
    let url = metadata.repository_url.as_deref().ok_or_else(|| {
        Error::InvalidRepository(format!("package {} has no repository field", metadata.name))
    })?;
    let repository = RepositoryRef::parse(url)?;

    let mut descriptor = Mapping::new();
    descriptor.insert("owner".into(), repository.owner.into());
    descriptor.insert("repo".into(), repository.repo.into());
    descriptor.insert("updaterCacheDirName".into(), metadata.name.clone().into());

    for (key, value) in publish_settings(build_config.get("publish")) {
        if let Some(name) = key.as_str().filter(|k| RESERVED_KEYS.contains(k)) {
            log::warn!("publish.{name} in {BUILD_CONFIG} overrides the computed value");
        }
        descriptor.insert(key, value);
    }

    Ok(descriptor)
}

/// Flatten the forms electron-builder accepts for `publish` into one mapping.
fn publish_settings(publish: Option<&Value>) -> Mapping {
    match publish {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Mapping(map)) => map.clone(),
        Some(Value::String(provider)) => provider_only(provider),
        Some(Value::Sequence(entries)) => match entries.first() {
            Some(Value::Mapping(map)) => map.clone(),
            Some(Value::String(provider)) => provider_only(provider),
            _ => Mapping::new(),
        },
        Some(other) => {
            log::warn!("ignoring unsupported publish setting in {BUILD_CONFIG}: {other:?}");
            Mapping::new()
        }
    }
}

fn provider_only(provider: &str) -> Mapping {
    let mut map = Mapping::new();
    map.insert("provider".into(), provider.into());
    map
}

/// Write the descriptor for already-parsed inputs.
///
/// Validation happens before anything touches the filesystem.
pub async fn write_descriptor(
    app_dir: &Path,
    metadata: &PackageMetadata,
    build_config: &Value,
) -> Result<PathBuf> {
    let descriptor = build_descriptor(metadata, build_config)?;
    let yaml = serde_yaml::to_string(&Value::Mapping(descriptor))?;

    let path = app_dir.join(UPDATE_DESCRIPTOR);
    tokio::fs::write(&path, yaml)
        .await
        .fs_context("writing update descriptor", &path)?;
    Ok(path)
}

/// Write `resources/app-update.yml` for an unpacked application.
pub async fn write_update_config(app_dir: &Path) -> Result<PathBuf> {
    let metadata = metadata::get_package_metadata(app_dir).await?;

    let config_path = app_dir.join(BUILD_CONFIG);
    let contents = tokio::fs::read_to_string(&config_path)
        .await
        .fs_context("reading build configuration", &config_path)?;
    let build_config: Value = serde_yaml::from_str(&contents)?;

    let path = write_descriptor(app_dir, &metadata, &build_config).await?;
    log::info!("app-update.yml written.");
    Ok(path)
}
