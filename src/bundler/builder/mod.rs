//! Packaging orchestration.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for the installer
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`tool_detection`] - WiX toolset and extractor availability checking

mod checksum;
mod orchestrator;
mod tool_detection;

pub use orchestrator::{Bundler, WORK_DIR_PREFIX};
