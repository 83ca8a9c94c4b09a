//! Windows MSI packaging for Electron distributions.
//!
//! Turns the `*-win.zip` build produced by electron-builder into an MSI
//! installer with the WiX 3 toolset:
//!
//! 1. Locate the archive in the distribution directory
//! 2. Unpack it into a scoped temporary work directory
//! 3. Write `resources/app-update.yml` for the auto-updater
//! 4. Render the WiX definition template over the unpacked file tree
//! 5. Compile every definition with `candle.exe`, concurrently
//! 6. Link the objects into `<Name> Setup <version>.msi` with `light.exe`
//!
//! The work directory is removed on every exit path.
//!
//! ```no_run
//! use kodegen_bundler_msi::bundler::{Bundler, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_msi::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_root(".")
//!     .build()?;
//!
//! let artifact = Bundler::new(settings).bundle().await?;
//! println!("{} ({} bytes, sha256 {})", artifact.path.display(), artifact.size, artifact.checksum);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
pub mod error;
pub(crate) mod platform;
mod settings;
pub(crate) mod utils;

pub use builder::{Bundler, WORK_DIR_PREFIX};
pub use error::{Context, Error, Result};
pub use settings::{Arch, MsiCompression, Settings, SettingsBuilder, WixSettings};

use std::path::PathBuf;

/// The installer produced by a packaging run.
///
/// # Fields
///
/// - `path`: Location of the `.msi`
/// - `size`: Size in bytes
/// - `checksum`: SHA-256 checksum for integrity verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Location of the `.msi`.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// SHA-256 checksum (hex).
    pub checksum: String,
}
