//! Configuration structures for MSI packaging.
//!
//! Typed settings for one packaging run plus the builder that derives
//! defaults from the project layout.

mod arch;
mod builder;
mod core;
mod windows;

// Re-export all public types
pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use windows::{MsiCompression, WixSettings};
