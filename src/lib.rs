//! Windows MSI packager for Electron applications.
//!
//! Takes the zipped Windows build electron-builder leaves in `dist/`, unpacks
//! it, writes the auto-update descriptor and drives the WiX 3 toolset to
//! produce an MSI installer.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod source;
pub mod update;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
