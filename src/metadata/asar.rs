//! Random-access reader for Electron `asar` resource archives.
//!
//! Layout: an 8 byte size pickle (`u32` 4, `u32` header length), then the
//! header pickle (`u32` payload length, `u32` JSON length, JSON index), then
//! the concatenated file contents. File offsets in the index are decimal
//! strings relative to the end of the header.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    io::SeekFrom,
    path::{Path, PathBuf},
};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Upper bound on followed symlinks while resolving an entry.
const MAX_LINK_DEPTH: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Node {
    Directory {
        files: BTreeMap<String, Node>,
    },
    File {
        size: u64,
        #[serde(default)]
        offset: Option<String>,
        #[serde(default)]
        unpacked: bool,
    },
    Link {
        link: String,
    },
}

/// An opened archive whose index has been read into memory.
#[derive(Debug)]
pub struct AsarArchive {
    path: PathBuf,
    root: Node,
    data_offset: u64,
}

impl AsarArchive {
    /// Read the archive header and index.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = tokio::fs::File::open(&path)
            .await
            .fs_context("opening asar archive", &path)?;

        let file_len = file
            .metadata()
            .await
            .fs_context("reading asar archive metadata", &path)?
            .len();

        let mut size_pickle = [0u8; 8];
        file.read_exact(&mut size_pickle)
            .await
            .fs_context("reading asar size header", &path)?;
        let header_len = u32::from_le_bytes([
            size_pickle[4],
            size_pickle[5],
            size_pickle[6],
            size_pickle[7],
        ]) as usize;
        if header_len < 8 {
            return Err(malformed(&path, format!("header length {header_len} too small")));
        }
        if 8 + header_len as u64 > file_len {
            return Err(malformed(
                &path,
                format!("header length {header_len} exceeds archive size {file_len}"),
            ));
        }

        let mut header = vec![0u8; header_len];
        file.read_exact(&mut header)
            .await
            .fs_context("reading asar header", &path)?;
        let json_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let json = header
            .get(8..8 + json_len)
            .ok_or_else(|| malformed(&path, format!("index length {json_len} exceeds header")))?;

        let root: Node = serde_json::from_slice(json)
            .map_err(|e| malformed(&path, format!("invalid index: {e}")))?;
        if !matches!(root, Node::Directory { .. }) {
            return Err(malformed(&path, "index root is not a directory".to_string()));
        }

        Ok(Self {
            path,
            root,
            data_offset: 8 + header_len as u64,
        })
    }

    /// Read one file from the archive without unpacking anything else.
    ///
    /// `entry` is a `/`-separated path relative to the archive root.
    pub async fn read_file(&self, entry: &str) -> Result<Vec<u8>> {
        let (resolved, node) = self.lookup(entry)?;
        let Node::File {
            size,
            offset,
            unpacked,
        } = node
        else {
            return Err(malformed(&self.path, format!("{entry} is not a file")));
        };

        if *unpacked {
            let mut unpacked_path = self.path.clone().into_os_string();
            unpacked_path.push(".unpacked");
            let on_disk = resolved
                .iter()
                .fold(PathBuf::from(unpacked_path), |p, part| p.join(part));
            return tokio::fs::read(&on_disk)
                .await
                .fs_context("reading unpacked asar entry", on_disk);
        }

        let offset: u64 = offset
            .as_deref()
            .ok_or_else(|| malformed(&self.path, format!("{entry} has no offset")))?
            .parse()
            .map_err(|_| malformed(&self.path, format!("{entry} has a non-numeric offset")))?;

        let mut file = tokio::fs::File::open(&self.path)
            .await
            .fs_context("opening asar archive", &self.path)?;
        let file_len = file
            .metadata()
            .await
            .fs_context("reading asar archive metadata", &self.path)?
            .len();
        let start = self
            .data_offset
            .checked_add(offset)
            .filter(|start| start.checked_add(*size).is_some_and(|end| end <= file_len))
            .ok_or_else(|| {
                malformed(
                    &self.path,
                    format!("{entry} (offset {offset}, size {size}) lies outside the archive"),
                )
            })?;

        file.seek(SeekFrom::Start(start))
            .await
            .fs_context("seeking in asar archive", &self.path)?;
        let mut buf = Vec::new();
        file.take(*size)
            .read_to_end(&mut buf)
            .await
            .fs_context("reading asar entry", &self.path)?;
        if buf.len() as u64 != *size {
            return Err(malformed(&self.path, format!("{entry} is truncated")));
        }
        Ok(buf)
    }

    fn lookup(&self, entry: &str) -> Result<(Vec<String>, &Node)> {
        let mut parts: Vec<String> = split(entry);
        for _ in 0..MAX_LINK_DEPTH {
            let mut node = &self.root;
            let mut walked = Vec::with_capacity(parts.len());
            let mut redirected = None;

            for (i, part) in parts.iter().enumerate() {
                let Node::Directory { files } = node else {
                    return Err(missing(&self.path, entry));
                };
                node = files.get(part).ok_or_else(|| missing(&self.path, entry))?;
                walked.push(part.clone());

                if let Node::Link { link } = node {
                    let mut target = split(link);
                    target.extend(parts[i + 1..].iter().cloned());
                    redirected = Some(target);
                    break;
                }
            }

            match redirected {
                Some(target) => parts = target,
                None => return Ok((walked, node)),
            }
        }
        Err(malformed(&self.path, format!("too many links resolving {entry}")))
    }
}

/// Read a single entry from the archive at `archive`.
pub async fn extract_file(archive: impl AsRef<Path>, entry: &str) -> Result<Vec<u8>> {
    AsarArchive::open(archive).await?.read_file(entry).await
}

fn split(entry: &str) -> Vec<String> {
    entry
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(String::from)
        .collect()
}

fn malformed(path: &Path, reason: String) -> Error {
    Error::Asar {
        path: path.to_path_buf(),
        reason,
    }
}

fn missing(path: &Path, entry: &str) -> Error {
    malformed(path, format!("no entry named {entry}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Build an archive with the given files; directory nesting follows `/`.
    fn pack(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut index = json!({ "files": {} });
        let mut data = Vec::new();
        for (name, content) in files {
            let mut node = &mut index;
            let parts: Vec<&str> = name.split('/').collect();
            for dir in &parts[..parts.len() - 1] {
                node = node["files"]
                    .as_object_mut()
                    .unwrap()
                    .entry(dir.to_string())
                    .or_insert_with(|| json!({ "files": {} }));
            }
            node["files"][parts[parts.len() - 1]] = json!({
                "size": content.len(),
                "offset": data.len().to_string(),
            });
            data.extend_from_slice(content);
        }
        finish(index, data)
    }

    fn finish(index: serde_json::Value, data: Vec<u8>) -> Vec<u8> {
        let json = serde_json::to_vec(&index).unwrap();
        let padded = (json.len() + 3) / 4 * 4;
        let payload_len = 4 + padded;
        let header_len = 4 + payload_len;

        let mut out = Vec::new();
        out.extend_from_slice(&4u32.to_le_bytes());
        out.extend_from_slice(&(header_len as u32).to_le_bytes());
        out.extend_from_slice(&(payload_len as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&json);
        out.resize(8 + header_len, 0);
        out.extend_from_slice(&data);
        out
    }

    async fn write(dir: &Path, bytes: Vec<u8>) -> PathBuf {
        let path = dir.join("app.asar");
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_read_top_level_entry() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            pack(&[
                ("index.js", b"console.log(1)"),
                ("package.json", br#"{"name":"demo"}"#),
            ]),
        )
        .await;

        let bytes = extract_file(&path, "package.json").await.unwrap();
        assert_eq!(bytes, br#"{"name":"demo"}"#);
    }

    #[tokio::test]
    async fn test_read_nested_entry() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            pack(&[("a.txt", b"aaa"), ("dist/main/b.txt", b"bbbb")]),
        )
        .await;

        let archive = AsarArchive::open(&path).await.unwrap();
        assert_eq!(archive.read_file("dist/main/b.txt").await.unwrap(), b"bbbb");
        assert_eq!(archive.read_file("/a.txt").await.unwrap(), b"aaa");
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), pack(&[("a.txt", b"aaa")])).await;

        let err = extract_file(&path, "package.json").await.unwrap_err();
        assert!(matches!(err, Error::Asar { .. }));
        assert!(err.to_string().contains("package.json"));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), pack(&[("dist/b.txt", b"b")])).await;

        assert!(extract_file(&path, "dist").await.is_err());
    }

    #[tokio::test]
    async fn test_unpacked_entry_reads_sibling_directory() {
        let temp = tempfile::tempdir().unwrap();
        let index = json!({ "files": { "native.node": { "size": 3, "unpacked": true } } });
        let path = write(temp.path(), finish(index, Vec::new())).await;
        let unpacked = temp.path().join("app.asar.unpacked");
        tokio::fs::create_dir_all(&unpacked).await.unwrap();
        tokio::fs::write(unpacked.join("native.node"), b"elf").await.unwrap();

        assert_eq!(extract_file(&path, "native.node").await.unwrap(), b"elf");
    }

    #[tokio::test]
    async fn test_link_is_followed() {
        let temp = tempfile::tempdir().unwrap();
        let index = json!({ "files": {
            "real": { "files": { "x.txt": { "size": 2, "offset": "0" } } },
            "alias": { "link": "real" },
        }});
        let path = write(temp.path(), finish(index, b"ok".to_vec())).await;

        assert_eq!(extract_file(&path, "alias/x.txt").await.unwrap(), b"ok");
    }

    #[tokio::test]
    async fn test_truncated_header_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), vec![4, 0, 0, 0, 64, 0, 0, 0, 1, 2]).await;

        assert!(AsarArchive::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_header_longer_than_file_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let mut bytes = vec![4, 0, 0, 0];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let path = write(temp.path(), bytes).await;

        let err = AsarArchive::open(&path).await.unwrap_err();
        assert!(matches!(err, Error::Asar { .. }));
        assert!(err.to_string().contains("exceeds archive size"));
    }

    #[tokio::test]
    async fn test_entry_size_beyond_archive_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let index = json!({ "files": {
            "package.json": { "size": 1_000_000_000_000_000u64, "offset": "0" },
        }});
        let path = write(temp.path(), finish(index, b"{}".to_vec())).await;

        let err = extract_file(&path, "package.json").await.unwrap_err();
        assert!(matches!(err, Error::Asar { .. }));
        assert!(err.to_string().contains("outside the archive"));
    }

    #[tokio::test]
    async fn test_entry_offset_overflow_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let index = json!({ "files": {
            "package.json": { "size": 2, "offset": u64::MAX.to_string() },
        }});
        let path = write(temp.path(), finish(index, b"{}".to_vec())).await;

        let err = extract_file(&path, "package.json").await.unwrap_err();
        assert!(matches!(err, Error::Asar { .. }));
    }
}
