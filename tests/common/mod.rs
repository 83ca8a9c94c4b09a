//! Shared fixtures: an electron-builder style project with a fake WiX toolset.

#![allow(dead_code)]

use serde_json::json;
use std::{
    fs,
    io::Write,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

pub const PACKAGE_JSON: &str = r#"{
  "name": "widget-desktop",
  "productName": "Widget",
  "version": "1.0.0",
  "repository": { "type": "git", "url": "https://github.com/acme/widget.git" }
}"#;

pub const BUILD_CONFIG: &str = "appId: io.acme.widget\npublish:\n  provider: github\n";

/// Compiler stand-in: writes the `-out` file.
pub const FAKE_CANDLE: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-out" ]; then out="$2"; shift; fi
  shift
done
printf 'wixobj' > "$out"
"#;

/// Linker stand-in: requires every object to exist, keeps the update
/// descriptor and its own arguments next to the MSI, then writes the MSI.
pub const FAKE_LIGHT: &str = r#"#!/bin/sh
out=""
appdir=""
args_file=""
for arg in "$@"; do
  case "$arg" in
    *.wixobj) [ -f "$arg" ] || exit 7 ;;
  esac
done
prev=""
for arg in "$@"; do
  case "$arg" in
    -dappDir=*) appdir="${arg#-dappDir=}" ;;
  esac
  if [ "$prev" = "-out" ]; then out="$arg"; fi
  prev="$arg"
done
dir=$(dirname "$out")
printf '%s\n' "$@" > "$dir/light.args"
cp "$appdir/resources/app-update.yml" "$dir/app-update.yml.seen"
printf 'MSI' > "$out"
"#;

/// Tool that always fails.
pub const FAILING_TOOL: &str = "#!/bin/sh\nexit 3\n";

/// Temporary project root.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    /// Empty `dist/`, the sample templates, the fake toolset and `tmp/`.
    pub fn new() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(project.dist()).unwrap();
        fs::create_dir_all(project.temp_root()).unwrap();

        let wix = project.root().join("build/wix");
        fs::create_dir_all(&wix).unwrap();
        let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/wix");
        fs::copy(templates.join("main.wxs"), wix.join("main.wxs")).unwrap();
        fs::copy(templates.join("dialogs.wxs"), wix.join("dialogs.wxs")).unwrap();

        project.install_tool("candle.exe", FAKE_CANDLE);
        project.install_tool("light.exe", FAKE_LIGHT);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn dist(&self) -> PathBuf {
        self.root().join("dist")
    }

    pub fn temp_root(&self) -> PathBuf {
        self.root().join("tmp")
    }

    pub fn wix_dir(&self) -> PathBuf {
        self.root().join("resources/host/wix")
    }

    pub fn install_tool(&self, name: &str, script: &str) {
        let dir = self.wix_dir();
        fs::create_dir_all(&dir).unwrap();
        write_executable(&dir.join(name), script);
    }

    /// Write `dist/<name>` containing a minimal Electron application.
    pub fn add_archive(&self, name: &str, package_json: &str) {
        let asar = pack_asar(&[("package.json", package_json.as_bytes())]);
        write_zip(
            &self.dist().join(name),
            &[
                ("Widget.exe", b"MZ".as_slice()),
                ("locales/en-US.pak", b"pak"),
                ("resources/app.asar", &asar),
                ("electron-builder.yml", BUILD_CONFIG.as_bytes()),
            ],
        );
    }

    /// Whether the work directory parent is empty.
    pub fn temp_is_empty(&self) -> bool {
        fs::read_dir(self.temp_root()).unwrap().next().is_none()
    }
}

pub fn write_executable(path: &Path, script: &str) {
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Compiler stand-in that fails on `dialogs.wxs` straight away and takes
/// `delay` seconds on anything else before touching `marker`.
pub fn slow_or_failing_candle(marker: &Path, delay: u32) -> String {
    format!(
        r#"#!/bin/sh
out=""
input=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-out" ]; then out="$arg"; fi
  prev="$arg"
  input="$arg"
done
case "$input" in
  *dialogs.wxs) exit 4 ;;
esac
sleep {delay}
touch '{marker}'
printf 'wixobj' > "$out"
"#,
        marker = marker.display()
    )
}

/// Compiler stand-in that holds `lock` for a second and touches `overlap`
/// when another instance already holds it.
pub fn exclusive_candle(lock: &Path, overlap: &Path) -> String {
    format!(
        r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-out" ]; then out="$arg"; fi
  prev="$arg"
done
if mkdir '{lock}' 2>/dev/null; then
  sleep 1
  rmdir '{lock}'
else
  touch '{overlap}'
  sleep 1
fi
printf 'wixobj' > "$out"
"#,
        lock = lock.display(),
        overlap = overlap.display()
    )
}

/// Build asar archive bytes with top-level files.
pub fn pack_asar(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut entries = serde_json::Map::new();
    let mut data = Vec::new();
    for (name, content) in files {
        entries.insert(
            name.to_string(),
            json!({ "size": content.len(), "offset": data.len().to_string() }),
        );
        data.extend_from_slice(content);
    }

    let json = serde_json::to_vec(&json!({ "files": entries })).unwrap();
    let padded = json.len().div_ceil(4) * 4;
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

pub fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}
