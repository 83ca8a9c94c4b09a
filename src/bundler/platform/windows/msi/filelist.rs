//! File list generation for the WiX definition template.
//!
//! Walks the unpacked application and produces the nested directory tree the
//! template iterates over. Every file becomes its own component so that
//! Windows Installer can track it individually.
//!
//! Identifiers are derived from the file's path relative to the application
//! directory with UUID v5, so the same file keeps the same component GUID in
//! every build and upgrades replace it in place.

use crate::bundler::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Namespace for component GUIDs and element ids.
const NAMESPACE: Uuid = Uuid::from_u128(0x6b2f_07c1_4d1e_4a53_9a0e_2c7d_91f4_be30);

/// Directory id the template places the application tree under.
pub const ROOT_DIRECTORY_ID: &str = "APPLICATIONFOLDER";

/// A file installed by the MSI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// `File/@Id`
    pub id: String,
    /// `Component/@Id`
    pub component_id: String,
    /// `Component/@Guid`, stable across builds.
    pub guid: String,
    /// File name.
    pub name: String,
    /// Backslash-prefixed path relative to the application directory,
    /// appended to `$(var.appDir)` in `File/@Source`.
    pub source: String,
}

/// A directory and everything below it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNode {
    /// `Directory/@Id`
    pub id: String,
    /// Directory name (empty for the root).
    pub name: String,
    /// Files directly in this directory, sorted by name.
    pub files: Vec<FileEntry>,
    /// Subdirectories, sorted by name.
    pub directories: Vec<DirectoryNode>,
}

/// Template input describing the application tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    /// The application directory itself.
    pub root: DirectoryNode,
    /// Every component id, for `ComponentGroup`/`Feature` references.
    pub components: Vec<String>,
    /// Total number of files.
    pub file_count: usize,
}

impl DirectoryNode {
    fn collect_components(&self, out: &mut Vec<String>) {
        out.extend(self.files.iter().map(|f| f.component_id.clone()));
        for dir in &self.directories {
            dir.collect_components(out);
        }
    }
}

/// Generate the file list for `app_dir`.
pub async fn generate(app_dir: &Path) -> Result<FileList> {
    let app_dir = app_dir.to_path_buf();
    tokio::task::spawn_blocking(move || generate_blocking(&app_dir)).await?
}

fn generate_blocking(app_dir: &Path) -> Result<FileList> {
    let mut root = walk(app_dir, Path::new(""))?;
    root.id = ROOT_DIRECTORY_ID.to_string();

    let mut components = Vec::new();
    root.collect_components(&mut components);
    let file_count = components.len();
    log::debug!("File list: {} files under {}", file_count, app_dir.display());

    Ok(FileList {
        root,
        components,
        file_count,
    })
}

fn walk(app_dir: &Path, relative: &Path) -> Result<DirectoryNode> {
    let mut node = DirectoryNode {
        id: element_id("dir", relative),
        name: relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        files: Vec::new(),
        directories: Vec::new(),
    };

    let entries = walkdir::WalkDir::new(app_dir.join(relative))
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry?;
        let child: PathBuf = relative.join(entry.file_name());
        let file_type = entry.file_type();

        if file_type.is_dir() {
            node.directories.push(walk(app_dir, &child)?);
        } else if file_type.is_file() {
            node.files.push(file_entry(&child)?);
        } else {
            log::warn!("Skipping non-regular file {}", entry.path().display());
        }
    }

    Ok(node)
}

fn file_entry(relative: &Path) -> Result<FileEntry> {
    let name = relative
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::GenericError(format!(
                "file name is not valid UTF-8: {}",
                relative.display()
            ))
        })?
        .to_string();

    Ok(FileEntry {
        id: element_id("fil", relative),
        component_id: element_id("cmp", relative),
        guid: component_guid(relative),
        name,
        source: windows_path(relative),
    })
}

/// `\`-joined path with a leading separator.
fn windows_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .fold(String::new(), |mut s, part| {
            s.push('\\');
            s.push_str(&part);
            s
        })
}

/// Key that is identical on every host OS for the same relative path.
fn path_key(relative: &Path) -> String {
    windows_path(relative).to_lowercase()
}

/// WiX identifier: prefix plus 32 hex digits, within the 72 character limit.
fn element_id(prefix: &str, relative: &Path) -> String {
    let key = format!("{prefix}:{}", path_key(relative));
    format!("{prefix}{}", Uuid::new_v5(&NAMESPACE, key.as_bytes()).simple())
}

fn component_guid(relative: &Path) -> String {
    let key = format!("component:{}", path_key(relative));
    Uuid::new_v5(&NAMESPACE, key.as_bytes())
        .hyphenated()
        .to_string()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn app_tree() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("resources/resources/win32")).unwrap();
        fs::create_dir_all(root.join("locales")).unwrap();
        fs::write(root.join("Widget.exe"), b"MZ").unwrap();
        fs::write(root.join("ffmpeg.dll"), b"MZ").unwrap();
        fs::write(root.join("resources/app.asar"), b"asar").unwrap();
        fs::write(root.join("resources/resources/win32/wsl-helper.exe"), b"MZ").unwrap();
        fs::write(root.join("locales/en-US.pak"), b"pak").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_tree_shape_is_sorted() {
        let temp = app_tree();
        let list = generate(temp.path()).await.unwrap();

        assert_eq!(list.root.id, ROOT_DIRECTORY_ID);
        let files: Vec<&str> = list.root.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(files, ["Widget.exe", "ffmpeg.dll"]);
        let dirs: Vec<&str> = list.root.directories.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(dirs, ["locales", "resources"]);
        assert_eq!(list.file_count, 5);
        assert_eq!(list.components.len(), 5);
    }

    #[tokio::test]
    async fn test_sources_are_backslash_relative() {
        let temp = app_tree();
        let list = generate(temp.path()).await.unwrap();

        let resources = &list.root.directories[1];
        let nested = &resources.directories[0].directories[0];
        assert_eq!(nested.files[0].source, "\\resources\\resources\\win32\\wsl-helper.exe");
        assert_eq!(resources.files[0].source, "\\resources\\app.asar");
    }

    #[tokio::test]
    async fn test_ids_are_stable_and_unique() {
        let first = generate(app_tree().path()).await.unwrap();
        let second = generate(app_tree().path()).await.unwrap();
        assert_eq!(first, second);

        let mut ids = first.components.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), first.file_count);
        assert!(ids.iter().all(|id| id.len() <= 72 && id.starts_with("cmp")));
    }

    #[test]
    fn test_guid_format() {
        let guid = component_guid(Path::new("resources/app.asar"));
        assert_eq!(guid.len(), 36);
        assert_eq!(guid, guid.to_uppercase());
    }
}
